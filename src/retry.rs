//! Retry policy for store operations

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How failed store operations are retried.
///
/// Backoff is linear: the wait before retry `n` (1-based) is `backoff_unit * n`.
/// At most `max_retries` retries follow the first attempt, so an operation runs
/// `max_retries + 1` times in total before its error is handed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Whether failed operations are retried at all
    pub enabled: bool,
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Base delay, multiplied by the retry number
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create an enabled policy
    pub fn new(max_retries: u32, backoff_unit: Duration) -> Self {
        Self {
            enabled: true,
            max_retries,
            backoff_unit,
        }
    }

    /// A policy that never retries
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Delay before the next attempt, given how many retries were already made.
    ///
    /// Returns `None` when the failure should be propagated instead.
    pub fn delay_for(&self, retries_made: u32) -> Option<Duration> {
        if !self.enabled || retries_made >= self.max_retries {
            return None;
        }
        Some(saturating_scale(self.backoff_unit, u64::from(retries_made) + 1))
    }

    /// Sum of all backoff sleeps when every attempt fails
    pub fn total_backoff(&self) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let n = u64::from(self.max_retries);
        // 1 + 2 + ... + n; fits in u64 for any u32 n
        saturating_scale(self.backoff_unit, n * (n + 1) / 2)
    }
}

/// `unit * factor`, clamped to `Duration::MAX`
fn saturating_scale(unit: Duration, factor: u64) -> Duration {
    let nanos = unit.as_nanos().saturating_mul(u128::from(factor));
    let secs = nanos / 1_000_000_000;
    match u64::try_from(secs) {
        Ok(secs) => Duration::new(secs, (nanos % 1_000_000_000) as u32),
        Err(_) => Duration::MAX,
    }
}
