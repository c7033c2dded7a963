//! Polling policies for the retry worker.
//!
//! This module groups the knobs that control **how often** the worker probes
//! for the remote service and **when** it gives up.
//!
//! ## Contents
//! - [`PollPolicy`] poll interval and attempt budget
//! - [`JitterPolicy`] optional randomization of the poll interval
//!
//! ## Quick wiring
//! ```text
//! ConnectorConfig { poll: PollPolicy, .. }
//!      └─► core::worker::RetryWorker uses:
//!           - poll.is_exhausted(attempt) to stop probing
//!           - poll.delay() to schedule the next probe
//! ```
//!
//! ## Defaults
//! - `PollPolicy::default()` → interval=10ms, max_attempts=2000 (≈20s), jitter=None.

mod jitter;
mod poll;

pub use jitter::JitterPolicy;
pub use poll::PollPolicy;
