//! # Shared connector state.
//!
//! Everything the connector mutates lives in [`Shared`], guarded by a single
//! `tokio::sync::Mutex` inside the connector. Transitions are therefore
//! totally ordered: hotplug, timing, bind and teardown never interleave.
//!
//! ## Rules
//! - `caps` is all-or-nothing: either every capability plus the registered
//!   bridge, or nothing.
//! - A disconnect transition clears `external_timing_fixed` before
//!   `device_connected` is updated.
//! - `worker` holds at most one retry worker; it is only taken by `deinitialize`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::bridge::CallbackBridge;
use crate::core::worker::WorkerExit;
use crate::remote::{CallbackRef, CallbackRegistrar, ConnectionObserver, VideoInfoProvider};

/// Coarse lifecycle state, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorState {
    /// `initialize` has not been called (or `deinitialize` reset the connector).
    Uninitialized,
    /// Service not bound yet; the retry worker is still probing.
    Retrying,
    /// All capabilities bound.
    Bound,
    /// Initialized but not bound, and no worker left to bind.
    Unbound,
}

/// Capability set committed by a successful bind.
pub(crate) struct Capabilities {
    pub registrar: Arc<dyn CallbackRegistrar>,
    pub info: Arc<dyn VideoInfoProvider>,
    pub observer: Arc<dyn ConnectionObserver>,
    pub bridge: Arc<CallbackBridge>,
    /// Same object as `bridge`, in the form handed to the registrar.
    pub callback: CallbackRef,
}

/// Handle to the running retry worker.
pub(crate) struct WorkerHandle {
    pub token: CancellationToken,
    pub join: JoinHandle<WorkerExit>,
}

/// Mutable connector state.
#[derive(Default)]
pub(crate) struct Shared {
    pub caps: Option<Capabilities>,
    pub worker: Option<WorkerHandle>,
    pub device_connected: bool,
    pub external_timing_fixed: bool,
    pub initialized: bool,
    pub retry_attempts: u32,
}

impl Shared {
    pub fn lifecycle(&self) -> ConnectorState {
        if !self.initialized {
            ConnectorState::Uninitialized
        } else if self.caps.is_some() {
            ConnectorState::Bound
        } else if self.worker.as_ref().is_some_and(|w| !w.join.is_finished()) {
            ConnectorState::Retrying
        } else {
            ConnectorState::Unbound
        }
    }
}
