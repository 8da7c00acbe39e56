//! Bounded exponential-backoff retry as a plain state machine.
//!
//! The machine only decides what happens next; callers perform the service
//! call and the wait. That keeps it usable from a blocking loop or an async
//! task alike.

use std::time::Duration;

use casebrief_common::{CaseBriefError, Result};

/// Retry limits for one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Wait after the first failure; doubles after each further failure
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(CaseBriefError::config("max_retries must be at least 1"));
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    /// Delay after a failed attempt (0-indexed): base * 2^attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Where a retry loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// About to make attempt `attempt` (0-indexed)
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed; wait `delay` before the next one
    Backoff { attempt: u32, delay: Duration },
    /// Attempt `attempt` succeeded
    Succeeded { attempt: u32 },
    /// All attempts failed
    Exhausted { attempts: u32 },
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Exhausted { .. })
    }
}

/// Result of one attempt, as seen by the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RetryableFailure,
}

/// Drives a single retry loop
#[derive(Debug, Clone)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: RetryState,
}

impl RetryMachine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Attempting { attempt: 0 },
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Calls made so far, counting the one in progress
    pub fn attempts(&self) -> u32 {
        match self.state {
            RetryState::Attempting { attempt }
            | RetryState::Backoff { attempt, .. }
            | RetryState::Succeeded { attempt } => attempt + 1,
            RetryState::Exhausted { attempts } => attempts,
        }
    }

    /// Record the outcome of the current attempt.
    ///
    /// Ignored unless the machine is `Attempting`.
    pub fn record(&mut self, outcome: AttemptOutcome) -> RetryState {
        if let RetryState::Attempting { attempt } = self.state {
            self.state = match outcome {
                AttemptOutcome::Success => RetryState::Succeeded { attempt },
                AttemptOutcome::RetryableFailure if attempt + 1 < self.policy.max_attempts => {
                    RetryState::Backoff {
                        attempt,
                        delay: self.policy.backoff_for(attempt),
                    }
                }
                AttemptOutcome::RetryableFailure => RetryState::Exhausted {
                    attempts: attempt + 1,
                },
            };
        }
        self.state
    }

    /// Leave `Backoff` once the delay has elapsed.
    ///
    /// Ignored unless the machine is in `Backoff`.
    pub fn resume(&mut self) -> RetryState {
        if let RetryState::Backoff { attempt, .. } = self.state {
            self.state = RetryState::Attempting {
                attempt: attempt + 1,
            };
        }
        self.state
    }
}
