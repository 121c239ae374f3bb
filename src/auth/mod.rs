//! Authentication module
//!
//! Supports: Bearer token, named API-key header
//!
//! Builds the per-request auth headers from a caller-supplied API key. Token
//! acquisition and refresh are out of scope.

mod types;

pub use types::{redact_key, AuthConfig, HeaderMode, DEFAULT_API_KEY_HEADER};
