//! # Poll policy for the retry worker.
//!
//! [`PollPolicy`] is parameterized by:
//! - [`PollPolicy::interval`] the fixed delay between reachability probes;
//! - [`PollPolicy::max_attempts`] how many failed probes are tolerated;
//! - [`PollPolicy::jitter`] optional randomization of the delay.
//!
//! Failed probes are counted from 1. A probe whose count goes past
//! `max_attempts` ends the worker, so the service gets `max_attempts`
//! waits (and `max_attempts + 1` probes) to show up.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use multidisplay::{JitterPolicy, PollPolicy};
//!
//! let poll = PollPolicy {
//!     interval: Duration::from_millis(10),
//!     max_attempts: 3,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(poll.delay(), Duration::from_millis(10));
//! assert!(!poll.is_exhausted(3));
//! assert!(poll.is_exhausted(4));
//! assert_eq!(poll.budget(), Duration::from_millis(30));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Poll interval and attempt budget for the retry worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two reachability probes.
    pub interval: Duration,
    /// Number of failed probes tolerated before giving up.
    pub max_attempts: u32,
    /// Jitter applied to `interval`.
    pub jitter: JitterPolicy,
}

impl Default for PollPolicy {
    /// Returns a policy with:
    /// - `interval = 10ms`;
    /// - `max_attempts = 2000` (about 20s of waiting);
    /// - `jitter = None`.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10),
            max_attempts: 2000,
            jitter: JitterPolicy::None,
        }
    }
}

impl PollPolicy {
    /// Delay before the next probe.
    pub fn delay(&self) -> Duration {
        self.jitter.apply(self.interval)
    }

    /// True once `attempt` (1-based count of failed probes) is past the budget.
    #[inline]
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        attempt > self.max_attempts
    }

    /// Upper bound of the total waiting time without jitter.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}
