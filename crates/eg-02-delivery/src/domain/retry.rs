//! Fixed-interval retry policy.
//!
//! No backoff and no jitter: every retry waits exactly `interval`. The budget
//! is wall-clock time measured from the first attempt, and a retry is only
//! scheduled if it would start before the budget runs out. The first attempt
//! always happens, so a zero budget means "try once". A zero interval also
//! disables retries, since it could never advance the clock.

use std::time::Duration;
use tokio::time::Instant;

use super::config::DeliveryConfig;

/// How long and how often to retry one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between attempts.
    pub interval: Duration,
    /// Total time allowed, counted from the first attempt.
    pub budget: Duration,
}

impl RetryPolicy {
    pub fn new(interval: Duration, budget: Duration) -> Self {
        Self { interval, budget }
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Start tracking a delivery that begins now.
    pub fn start(&self) -> RetryState {
        RetryState {
            policy: *self,
            started: Instant::now(),
            attempts: 0,
        }
    }
}

impl From<&DeliveryConfig> for RetryPolicy {
    fn from(config: &DeliveryConfig) -> Self {
        Self::new(config.retry_interval, config.retry_duration)
    }
}

/// Progress of one endpoint's retry loop.
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    started: Instant,
    attempts: u32,
}

impl RetryState {
    /// Count an attempt about to be made.
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Time since the first attempt.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Delay before the next attempt, or `None` once the budget is spent.
    pub fn next_delay(&self) -> Option<Duration> {
        if self.policy.budget.is_zero() || self.policy.interval.is_zero() {
            return None;
        }
        let next_start = self.elapsed().checked_add(self.policy.interval)?;
        (next_start <= self.policy.budget).then_some(self.policy.interval)
    }
}
