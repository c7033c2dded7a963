//! # LogWriter: events to `tracing`
//!
//! A subscriber that writes incoming [`Event`]s through `tracing` macros.
//!
//! ## Example output
//! ```text
//! INFO  bind succeeded connected=true
//! DEBUG retry scheduled attempt=3 delay_ms=10
//! WARN  retry exhausted attempt=2001
//! INFO  hotplug forwarded display=external connected=false
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::BindSucceeded => info!(connected = ?e.connected, "bind succeeded"),
            EventKind::BindFailed => error!(reason, "bind failed"),
            EventKind::Unbound => info!("service unbound"),
            EventKind::RetryStarted => info!("service not running, retrying in background"),
            EventKind::RetryScheduled => {
                debug!(attempt = ?e.attempt, delay_ms = ?e.delay_ms, "retry scheduled")
            }
            EventKind::RetryExhausted => warn!(attempt = ?e.attempt, "retry exhausted"),
            EventKind::RetryCancelled => info!(attempt = ?e.attempt, "retry cancelled"),
            EventKind::HotplugForwarded => info!(
                display = ?e.display,
                connected = ?e.connected,
                reason,
                "hotplug forwarded"
            ),
            EventKind::HotplugIgnored => warn!(
                display = ?e.display,
                connected = ?e.connected,
                reason,
                "hotplug ignored"
            ),
            EventKind::BlankRequested => info!(blank = ?e.connected, "blank requested"),
            EventKind::VideoStateChanged => {
                debug!(session = ?e.session, state = reason, "video state changed")
            }
            EventKind::TimingRequested => {
                info!(mode = reason, applied = ?e.connected, "timing requested")
            }
            EventKind::InputStateChanged => info!(active = ?e.connected, "input state"),
            EventKind::UnsupportedRequest => warn!(operation = reason, "unsupported request"),
            EventKind::SubscriberOverflow => warn!(reason, "subscriber overflow"),
            EventKind::SubscriberPanicked => error!(reason, "subscriber panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
