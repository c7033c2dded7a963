//! # multidisplay
//!
//! **multidisplay** keeps a local display pipeline connected to an external
//! multi-display service that may start later, restart, or never show up.
//!
//! It binds the service's three capabilities (callback registration, video
//! info, connection observer) as one transaction, forwards HDMI hotplug to the
//! service, and routes the service's push notifications (blank, video state,
//! timing) back into the local pipeline.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!       DisplayDriver / DisplayAnalyzer / DisplayDeviceRegistry
//!                      (LocalPipeline, injected)
//!                                ▲
//!                                │ post_*_event / set_mode / is_connected
//! ┌──────────────────────────────┴────────────────────────────────────┐
//! │  ServiceConnector                                                 │
//! │  - Mutex<Shared> (capabilities, flags, worker handle)             │
//! │  - bind transaction (registrar → register → info → observer)      │
//! │  - Bus (broadcast events)                                         │
//! └──────┬──────────────────────────┬─────────────────────────┬───────┘
//!        │ spawns (service absent)  │ registers               │ publishes
//!        ▼                          ▼                         ▼
//!  ┌──────────────┐        ┌────────────────┐        ┌─────────────────┐
//!  │ RetryWorker  │        │ CallbackBridge │        │ Bus ─► listener │
//!  │ (poll loop)  │        │ (Weak back-ref)│        │ ─► SubscriberSet│
//!  └──────┬───────┘        └───────┬────────┘        └─────────────────┘
//!         │ check_service           │ blank / video / timing
//!         ▼                         │
//! ┌─────────────────────────────────┴─────────────────────────────────┐
//! │  ServiceDirectory ─► DisplayService (remote, injected)            │
//! │   CallbackRegistrar · VideoInfoProvider · ConnectionObserver      │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! initialize()
//!   ├─ service running ─► bind ─┬─ Ok  ─► BOUND
//!   │                          └─ Err ─► RetryWorker
//!   └─ service absent  ─► RetryWorker
//!
//! RetryWorker loop {
//!   ├─► lock, re-check cancellation
//!   ├─► check_service
//!   │     ├─ running ─► bind ─► exit (Bound / BindFailed)
//!   │     └─ absent  ─► attempt += 1
//!   │                   ├─ attempt > max_attempts ─► RetryExhausted, exit
//!   │                   └─ RetryScheduled, sleep(poll.delay()) (cancellable)
//! }
//!
//! deinitialize()
//!   ├─► cancel worker, release capabilities (under lock)
//!   └─► await worker (lock released)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Connector**     | Bind, rebind and teardown of the remote service.             | [`ServiceConnector`], [`ConnectorBuilder`]  |
//! | **Remote seam**   | Capabilities the service exposes, callbacks it drives.       | [`ServiceDirectory`], [`DisplayCallback`]   |
//! | **Local seam**    | Display pipeline collaborators.                              | [`LocalPipeline`], [`DisplayAnalyzer`]      |
//! | **Policies**      | Poll interval, attempt budget, jitter.                       | [`PollPolicy`], [`JitterPolicy`]            |
//! | **Subscriber API**| Hook into connector events.                                  | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors for connector calls and remote failures.        | [`ConnectorError`], [`RemoteError`]         |
//! | **Configuration** | Centralized settings.                                        | [`ConnectorConfig`]                         |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], a subscriber that writes
//!   events through `tracing`.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use multidisplay::{
//!     ConnectorConfig, DisplayAnalyzer, DisplayDeviceRegistry, DisplayDriver, DisplayId,
//!     DisplayService, ExternalDevice, LocalPipeline, ServiceConnector, ServiceDirectory,
//! };
//!
//! struct Nothing;
//!
//! #[async_trait]
//! impl ServiceDirectory for Nothing {
//!     async fn check_service(&self, _name: &str) -> bool { false }
//!     async fn get_service(&self, _name: &str) -> Option<Arc<dyn DisplayService>> { None }
//! }
//! impl DisplayAnalyzer for Nothing {
//!     fn post_blank_event(&self, _blank: bool) {}
//!     fn post_video_event(&self, _session: i32, _preparing: bool, _playing: bool) {}
//! }
//! impl DisplayDeviceRegistry for Nothing {
//!     fn external_device(&self, _id: DisplayId) -> Option<Arc<dyn ExternalDevice>> { None }
//! }
//! impl DisplayDriver for Nothing {
//!     fn is_connected(&self, _id: DisplayId) -> bool { false }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let nothing = Arc::new(Nothing);
//!     let pipeline = LocalPipeline::new(nothing.clone(), nothing.clone(), nothing.clone());
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn multidisplay::Subscribe>> = vec![Arc::new(multidisplay::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn multidisplay::Subscribe>> = Vec::new();
//!
//!     let connector = ServiceConnector::builder(ConnectorConfig::default())
//!         .with_subscribers(subs)
//!         .build(nothing, pipeline);
//!
//!     // Returns at once; a background worker waits for the service.
//!     assert!(connector.initialize().await);
//!     let _ = connector.notify_hot_plug(DisplayId::EXTERNAL, true).await;
//!     connector.deinitialize().await;
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod pipeline;
mod policies;
mod remote;
mod subscribers;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::{ConnectorConfig, DEFAULT_SERVICE_NAME};
pub use core::{CallbackBridge, ConnectorBuilder, ConnectorState, ServiceConnector, WorkerExit};
pub use error::{BindStage, ConnectorError, RemoteError};
pub use events::{Bus, Event, EventKind};
pub use pipeline::{
    DisplayAnalyzer, DisplayDeviceRegistry, DisplayDriver, DisplayId, DisplayMode,
    ExternalDevice, LocalPipeline,
};
pub use policies::{JitterPolicy, PollPolicy};
pub use remote::{
    CallbackRef, CallbackRegistrar, ConnectionObserver, DisplayCallback, DisplayService,
    HdmiTiming, RemoteVideoSourceInfo, ScalingType, ServiceDirectory, SessionId,
    VideoInfoProvider, VideoSourceInfo, VideoState,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: a built-in subscriber that writes events through `tracing`.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
