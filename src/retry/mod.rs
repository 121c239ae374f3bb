//! Retry module
//!
//! Bounded exponential backoff with jitter around a single fallible async
//! operation.
//!
//! # Overview
//!
//! - `RetryPolicy` - attempt cap, initial delay, growth factor, jitter
//! - `Retrier` - runs an operation under a policy, reporting each wait to a
//!   `RetryObserver`
//!
//! Only transient failures are retried: HTTP 429, any 5xx, and transport-level
//! errors. Everything else is returned on the first attempt.

mod policy;
mod retrier;

pub use policy::{jittered, RetryPolicy, JITTER_RATIO};
pub use retrier::{LogObserver, Retrier, RetryEvent, RetryObserver};
