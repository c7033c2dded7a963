//! Connector core: binding, retry worker and notification bridging.
//!
//! The public API from this module is [`ServiceConnector`] (plus its builder,
//! the [`CallbackBridge`] and diagnostic enums).
//!
//! Internal modules:
//! - [`connector`]: the state machine and public entry points;
//! - [`bind`]: all-or-nothing acquisition and release of the remote capabilities;
//! - [`bridge`]: remote push notifications forwarded into the connector;
//! - [`worker`]: cancellable polling task that binds a late service;
//! - [`state`]: the mutex-guarded connector state;
//! - [`builder`]: wiring of bus, subscribers and injected collaborators.

mod bind;
mod bridge;
mod builder;
mod connector;
mod state;
mod worker;

pub use bridge::CallbackBridge;
pub use builder::ConnectorBuilder;
pub use connector::ServiceConnector;
pub use state::ConnectorState;
pub use worker::WorkerExit;
