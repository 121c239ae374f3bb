//! Retry loop
//!
//! Each call to [`Retrier::run`] owns its attempt counter and delay, so one
//! retrier can be shared across concurrent fetches.

use super::policy::RetryPolicy;
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Reported before each wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryEvent {
    /// Retry number, starting at 1
    pub attempt: u32,
    /// Wait before the retry
    pub delay: Duration,
    /// HTTP status of the failure (absent for transport errors)
    pub status: Option<u16>,
}

/// Receives retry notifications. Has no influence on the retry decision.
pub trait RetryObserver: Send + Sync {
    /// Called before waiting for a retry
    fn on_retry(&self, event: &RetryEvent);
}

impl<F> RetryObserver for F
where
    F: Fn(&RetryEvent) + Send + Sync,
{
    fn on_retry(&self, event: &RetryEvent) {
        self(event);
    }
}

/// Observer that logs each retry
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RetryObserver for LogObserver {
    fn on_retry(&self, event: &RetryEvent) {
        match event.status {
            Some(429) => warn!(
                "Rate limited (429). Retry #{} in {}ms",
                event.attempt,
                event.delay.as_millis()
            ),
            Some(status) => warn!(
                "Request failed with {}, retry #{} in {}ms",
                status,
                event.attempt,
                event.delay.as_millis()
            ),
            None => warn!(
                "Transport error, retry #{} in {}ms",
                event.attempt,
                event.delay.as_millis()
            ),
        }
    }
}

/// Runs fallible operations under a [`RetryPolicy`]
#[derive(Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
}

impl Retrier {
    /// Create a retrier that logs its retries
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replace the retry observer
    #[must_use]
    pub fn with_observer(mut self, observer: impl RetryObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Get the policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// On exhaustion the last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut failures = 0u32;
        let mut delay = self.policy.initial_delay;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            failures += 1;
            if !err.is_retryable() || failures > self.policy.max_retries {
                return Err(err);
            }

            let wait = self.policy.wait_for(delay);
            self.observer.on_retry(&RetryEvent {
                attempt: failures,
                delay: wait,
                status: err.status(),
            });

            tokio::time::sleep(wait).await;
            delay = self.policy.next_delay(delay);
        }
    }
}

impl Default for Retrier {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
