//! Retry policy
//!
//! Delay for retry `n` (1-based) is `initial_delay * factor^(n-1)`, capped at
//! `max_delay`, optionally perturbed by up to ±15%.

use crate::error::{Error, Result};
use rand::Rng;
use std::time::Duration;

/// Maximum relative jitter applied to a nominal delay
pub const JITTER_RATIO: f64 = 0.15;

/// Governs how a failed operation is retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Growth factor applied after each wait (must be > 1)
    pub factor: f64,
    /// Randomize each wait by up to ±15%
    pub jitter: bool,
    /// Upper bound for a single nominal wait
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(500),
            factor: 2.0,
            jitter: true,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt cap, initial delay and factor
    pub fn new(max_retries: u32, initial_delay: Duration, factor: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            factor,
            ..Default::default()
        }
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Fast policy for tests (1ms initial, no jitter)
    pub fn fast(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(1),
            factor: 2.0,
            jitter: false,
            max_delay: Duration::from_millis(100),
        }
    }

    /// Enable or disable jitter
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Set the cap for a single wait
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Total attempts allowed, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Validate the policy values
    pub fn validate(&self) -> Result<()> {
        if !self.factor.is_finite() || self.factor <= 1.0 {
            return Err(Error::invalid_value(
                "backoff_factor",
                format!("must be greater than 1, got {}", self.factor),
            ));
        }
        if self.max_delay < self.initial_delay {
            return Err(Error::invalid_value(
                "max_delay",
                "must not be smaller than the initial delay",
            ));
        }
        Ok(())
    }

    /// Nominal delay following `delay`
    pub fn next_delay(&self, delay: Duration) -> Duration {
        let next = delay.as_secs_f64() * self.factor;
        let max = self.max_delay.as_secs_f64();
        if next.is_finite() && next < max {
            Duration::from_secs_f64(next)
        } else {
            self.max_delay
        }
    }

    /// Actual wait for a nominal delay, applying jitter when enabled
    pub fn wait_for(&self, delay: Duration) -> Duration {
        if self.jitter {
            jittered(delay)
        } else {
            delay
        }
    }
}

/// Perturb `delay` by a uniform offset in `[-15%, +15%]`
pub fn jittered(delay: Duration) -> Duration {
    if delay.is_zero() {
        return delay;
    }
    let offset = rand::thread_rng().gen_range(-JITTER_RATIO..=JITTER_RATIO);
    delay.mul_f64(1.0 + offset)
}
