//! # Jitter policy for poll delays.
//!
//! [`JitterPolicy`] optionally randomizes the poll interval so that several
//! connectors started by the same boot sequence do not probe the service
//! directory in lockstep.
//!
//! - [`JitterPolicy::None`]: exact interval (default)
//! - [`JitterPolicy::Full`]: random delay in [0, interval]
//! - [`JitterPolicy::Equal`]: interval/2 + random[0, interval/2]

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of poll delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the poll interval as-is.
    #[default]
    None,
    /// Random delay in [0, interval].
    Full,
    /// Half the interval plus a random share of the other half.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return delay;
        }
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Duration::from_millis(rand::rng().random_range(0..=ms)),
            JitterPolicy::Equal => {
                let half = ms / 2;
                let extra = rand::rng().random_range(0..=ms - half);
                Duration::from_millis(half + extra)
            }
        }
    }
}
