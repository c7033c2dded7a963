//! Connector events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `ServiceConnector`, `CallbackBridge`, `RetryWorker`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the builder's listener (fans out to `SubscriberSet`) and
//!   any receiver obtained through `ServiceConnector::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
