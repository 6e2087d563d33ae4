//! Retry policy for pipeline units
//!
//! A unit (one card's content + illustration) is restarted from scratch after a
//! failure. The policy decides whether another attempt is allowed and how long
//! to wait before it.

use std::time::Duration;

/// Default wait between unit attempts.
pub const DEFAULT_UNIT_BACKOFF: Duration = Duration::from_secs(1);

/// Default cap on attempts per unit.
pub const DEFAULT_UNIT_MAX_ATTEMPTS: u32 = 10;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (None = retry forever)
    pub max_attempts: Option<u32>,
    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::bounded(DEFAULT_UNIT_MAX_ATTEMPTS, DEFAULT_UNIT_BACKOFF)
    }
}

impl RetryPolicy {
    /// Give up after `max_attempts` attempts. Zero is treated as one attempt.
    pub fn bounded(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            backoff,
        }
    }

    /// Keep restarting until the unit succeeds.
    pub fn unbounded(backoff: Duration) -> Self {
        Self {
            max_attempts: None,
            backoff,
        }
    }

    /// Build from a configured cap where 0 means "no cap".
    pub fn from_config(max_attempts: u32, backoff: Duration) -> Self {
        if max_attempts == 0 {
            Self::unbounded(backoff)
        } else {
            Self::bounded(max_attempts, backoff)
        }
    }

    /// Whether attempt number `attempt` (1-based) may run.
    pub fn allows_attempt(&self, attempt: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempt <= max,
            None => true,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max_attempts.is_some()
    }

    /// Sleep for the configured backoff.
    pub async fn wait(&self) {
        if !self.backoff.is_zero() {
            tokio::time::sleep(self.backoff).await;
        }
    }
}
