//! # Connector configuration.
//!
//! Provides [`ConnectorConfig`], the centralized settings for a
//! [`ServiceConnector`](crate::ServiceConnector).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`ConnectorConfig::bus_capacity_clamped`]
//! - `poll.max_attempts = 0` → the worker gives up after the first failed probe

use crate::pipeline::DisplayId;
use crate::policies::PollPolicy;

/// Name under which the multi-display service registers itself.
pub const DEFAULT_SERVICE_NAME: &str = "MultiDisplay";

/// Configuration for the service connector.
///
/// ## Field semantics
/// - `service_name`: directory name probed and looked up at bind time
/// - `external_display`: the only display whose hotplug events are forwarded
/// - `poll`: retry worker interval and attempt budget
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct ConnectorConfig {
    /// Name of the remote service in the service directory.
    pub service_name: String,

    /// Logical identifier of the external display.
    pub external_display: DisplayId,

    /// Retry worker polling behavior.
    pub poll: PollPolicy,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// skip older items.
    pub bus_capacity: usize,
}

impl ConnectorConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ConnectorConfig {
    /// Default configuration:
    ///
    /// - `service_name = "MultiDisplay"`
    /// - `external_display = DisplayId::EXTERNAL`
    /// - `poll = PollPolicy::default()` (10ms × 2000)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            external_display: DisplayId::EXTERNAL,
            poll: PollPolicy::default(),
            bus_capacity: 1024,
        }
    }
}
