//! Consecutive-failure budget
//!
//! Long retrieval runs tolerate isolated failures (a missing manifest, one
//! bad download) but must not grind through thousands of swaths once the
//! archive is genuinely down. The budget counts consecutive failures across
//! the whole run and converts the Nth one into a fatal error; any success
//! resets the count.

use tracing::warn;

use crate::{Error, Result};

/// Shared failure counter for one run
#[derive(Debug)]
pub struct ErrorBudget {
    consecutive_failures: usize,
    limit: usize,
}

impl ErrorBudget {
    /// Budget allowing `limit - 1` consecutive failures; the `limit`-th
    /// aborts the run
    pub fn new(limit: usize) -> Self {
        Self {
            consecutive_failures: 0,
            limit,
        }
    }

    /// Record one recoverable failure. Returns an error when the budget is
    /// spent; the caller propagates it to end the run.
    pub fn record_failure(&mut self, context: &str) -> Result<()> {
        self.consecutive_failures += 1;
        warn!(
            "{context} (consecutive failure {}/{})",
            self.consecutive_failures, self.limit
        );
        if self.consecutive_failures >= self.limit {
            return Err(Error::ErrorBudgetExceeded {
                failures: self.consecutive_failures,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Record a completed unit of work, resetting the failure streak
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Current failure streak length
    pub fn consecutive_failures(&self) -> usize {
        self.consecutive_failures
    }
}
