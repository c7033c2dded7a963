//! # Event subscribers.
//!
//! ```text
//! Connector ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                        ├──► LogWriter (feature "logging")
//!                                                        └──► custom Subscribe impls
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use multidisplay::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct HotplugCounter;
//!
//! #[async_trait]
//! impl Subscribe for HotplugCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::HotplugForwarded {
//!             // count it
//!         }
//!     }
//!     fn name(&self) -> &'static str { "hotplug-counter" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
