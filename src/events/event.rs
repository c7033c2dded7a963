//! # Connector events.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Binding**: bind success/failure and release of the capabilities
//! - **Retry worker**: start, scheduled probe, exhaustion, cancellation
//! - **Notifications**: hotplug, blank, video state, timing, input, unsupported requests
//! - **Subscribers**: overflow and panic of a subscriber worker
//!
//! The [`Event`] struct carries optional metadata (display, session, attempt,
//! delay, reason) set according to the kind.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use multidisplay::{DisplayId, Event, EventKind};
//!
//! let ev = Event::new(EventKind::RetryScheduled)
//!     .with_attempt(3)
//!     .with_delay(Duration::from_millis(10));
//!
//! assert_eq!(ev.kind, EventKind::RetryScheduled);
//! assert_eq!(ev.attempt, Some(3));
//! assert_eq!(ev.delay_ms, Some(10));
//!
//! let hp = Event::new(EventKind::HotplugForwarded).with_hotplug(DisplayId::EXTERNAL, true);
//! assert_eq!(hp.connected, Some(true));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::pipeline::DisplayId;
use crate::remote::SessionId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of connector events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Binding ===
    /// All three capabilities acquired and the bridge registered.
    ///
    /// Sets: `connected` (physical state read from the driver)
    BindSucceeded,

    /// Service reachable but the bind transaction was rolled back.
    ///
    /// Sets: `reason`
    BindFailed,

    /// Capabilities released by `deinitialize`.
    Unbound,

    // === Retry worker ===
    /// Service not reachable at `initialize`; worker spawned.
    RetryStarted,

    /// Probe failed; next probe scheduled.
    ///
    /// Sets: `attempt`, `delay_ms`
    RetryScheduled,

    /// Attempt budget spent; worker exits without binding.
    ///
    /// Sets: `attempt`, `reason`
    RetryExhausted,

    /// Worker stopped by `deinitialize`.
    ///
    /// Sets: `attempt`
    RetryCancelled,

    // === Notifications ===
    /// Hotplug forwarded to the connection observer.
    ///
    /// Sets: `display`, `connected`, `reason` (only when the remote call failed)
    HotplugForwarded,

    /// Hotplug dropped (foreign display or duplicate state).
    ///
    /// Sets: `display`, `connected`, `reason`
    HotplugIgnored,

    /// Blank request forwarded to the analyzer.
    ///
    /// Sets: `connected` (`true` = blank)
    BlankRequested,

    /// Video state forwarded to the analyzer.
    ///
    /// Sets: `session`, `reason` (state name)
    VideoStateChanged,

    /// Timing request recorded (and applied if a device is attached).
    ///
    /// Sets: `reason` (mode), `connected` (whether a device received it)
    TimingRequested,

    /// Input state reported by the service (informational).
    ///
    /// Sets: `connected` (input active)
    InputStateChanged,

    /// Service asked for a capability this variant does not implement.
    ///
    /// Sets: `reason` (operation)
    UnsupportedRequest,

    // === Subscribers ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason`
    SubscriberOverflow,

    /// Subscriber panicked while handling an event.
    ///
    /// Sets: `reason`
    SubscriberPanicked,
}

/// Connector event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Display the event refers to.
    pub display: Option<DisplayId>,
    /// Connection / boolean payload (see [`EventKind`] for meaning).
    pub connected: Option<bool>,
    /// Video session id.
    pub session: Option<SessionId>,
    /// Retry attempt (1-based count of failed probes).
    pub attempt: Option<u32>,
    /// Delay before the next probe in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            display: None,
            connected: None,
            session: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches display and connection state.
    #[inline]
    pub fn with_hotplug(mut self, display: DisplayId, connected: bool) -> Self {
        self.display = Some(display);
        self.connected = Some(connected);
        self
    }

    /// Attaches a boolean payload.
    #[inline]
    pub fn with_flag(mut self, value: bool) -> Self {
        self.connected = Some(value);
        self
    }

    /// Attaches a video session id.
    #[inline]
    pub fn with_session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::Unbound);
        let b = Event::new(EventKind::Unbound);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_is_clamped_to_u32() {
        let ev = Event::new(EventKind::RetryScheduled).with_delay(Duration::MAX);
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
