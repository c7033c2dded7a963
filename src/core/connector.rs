//! # ServiceConnector: the bind/rebind state machine.
//!
//! ```text
//!                    initialize()
//! UNINITIALIZED ───────────────────► BINDING (probe + bind, under lock)
//!                                       ├── bound ─────────────► BOUND
//!                                       └── absent / failed ───► RETRYING (RetryWorker)
//!                                                                  ├── bound ──────► BOUND
//!                                                                  └── exhausted ──► UNBOUND
//! any state ── deinitialize() ──► UNINITIALIZED (capabilities released, worker joined)
//! ```
//!
//! ## Rules
//! - One `tokio::sync::Mutex` guards every field of [`Shared`]; every public
//!   method and the retry step take it for their whole critical section.
//! - `initialize` never waits for the service: if it is absent the retry
//!   worker takes over and `initialize` returns immediately.
//! - `deinitialize` cancels and detaches the worker under the lock and awaits
//!   it after releasing the lock (the worker needs the lock to observe
//!   cancellation).
//! - Local collaborators are called with the lock held and must not call back
//!   into the connector.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;

use crate::config::ConnectorConfig;
use crate::core::bind;
use crate::core::bridge::CallbackBridge;
use crate::core::builder::ConnectorBuilder;
use crate::core::state::{ConnectorState, Shared, WorkerHandle};
use crate::core::worker::{RetryStep, RetryWorker};
use crate::error::ConnectorError;
use crate::events::{Bus, Event, EventKind};
use crate::pipeline::{DisplayId, LocalPipeline};
use crate::remote::{HdmiTiming, ServiceDirectory, SessionId, VideoSourceInfo, VideoState};

pub(crate) struct Inner {
    pub(crate) cfg: ConnectorConfig,
    pub(crate) directory: Arc<dyn ServiceDirectory>,
    pub(crate) pipeline: LocalPipeline,
    pub(crate) bus: Bus,
    /// Stops the subscriber listener when the connector goes away.
    pub(crate) listener: CancellationToken,
    pub(crate) state: Mutex<Shared>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let st = self.state.get_mut();
        if let Some(worker) = st.worker.take() {
            worker.token.cancel();
        }

        // Dropped without `deinitialize`: the bridge must not stay registered.
        if let Some(caps) = st.caps.take() {
            caps.bridge.detach();
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let bus = self.bus.clone();
                    runtime.spawn(async move {
                        bind::release(caps).await;
                        bus.publish(
                            Event::new(EventKind::Unbound).with_reason("connector dropped"),
                        );
                    });
                }
                Err(_) => self.bus.publish(
                    Event::new(EventKind::Unbound)
                        .with_reason("connector dropped outside a runtime, callback left registered"),
                ),
            }
        }
        self.listener.cancel();
    }
}

/// Connection manager between the local display pipeline and the remote
/// multi-display service.
///
/// Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct ServiceConnector {
    inner: Arc<Inner>,
}

impl ServiceConnector {
    /// Returns a builder for a connector with the given configuration.
    pub fn builder(cfg: ConnectorConfig) -> ConnectorBuilder {
        ConnectorBuilder::new(cfg)
    }

    /// Creates a connector without subscribers.
    pub fn new(
        cfg: ConnectorConfig,
        directory: Arc<dyn ServiceDirectory>,
        pipeline: LocalPipeline,
    ) -> Self {
        ConnectorBuilder::new(cfg).build(directory, pipeline)
    }

    pub(crate) fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Configuration this connector was built with.
    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.cfg
    }

    /// Raw receiver for connector events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Binds to the service, or starts the retry worker if it is not running.
    ///
    /// Idempotent: a second call on an initialized connector returns `true`
    /// without side effects. The connector counts as initialized even when
    /// the service is not bound yet. Returns `false` only if the retry worker
    /// could not be spawned (no tokio runtime).
    pub async fn initialize(&self) -> bool {
        let mut st = self.inner.state.lock().await;
        if st.initialized {
            return true;
        }

        // Fast path: the service started before us.
        let started = if self.service_running().await {
            match self.bind_locked(&mut st).await {
                Ok(()) => true,
                Err(_) => self.start_worker(&mut st),
            }
        } else {
            self.start_worker(&mut st)
        };

        st.initialized = true;
        started
    }

    /// Stops the retry worker, releases every capability and resets state.
    ///
    /// Safe to call repeatedly and without a prior [`initialize`](Self::initialize).
    pub async fn deinitialize(&self) {
        let detached = {
            let mut st = self.inner.state.lock().await;
            let detached = st.worker.take();
            if let Some(worker) = &detached {
                worker.token.cancel();
            }
            st.retry_attempts = 0;
            self.unbind_locked(&mut st).await;
            st.initialized = false;
            detached
        };

        if let Some(worker) = detached {
            let _ = worker.join.await;
        }
    }

    /// One probe of the retry worker. Runs under the connector lock.
    pub(crate) async fn try_bind_once(&self, token: &CancellationToken) -> RetryStep {
        let mut st = self.inner.state.lock().await;
        if token.is_cancelled() {
            self.inner
                .bus
                .publish(Event::new(EventKind::RetryCancelled).with_attempt(st.retry_attempts));
            return RetryStep::Cancelled;
        }

        if self.service_running().await {
            // A reachable service that cannot be bound is a service defect,
            // not a startup race: stop either way.
            return match self.bind_locked(&mut st).await {
                Ok(()) => RetryStep::Bound,
                Err(_) => RetryStep::BindFailed,
            };
        }

        st.retry_attempts = st.retry_attempts.saturating_add(1);
        let attempt = st.retry_attempts;
        if self.inner.cfg.poll.is_exhausted(attempt) {
            let err = ConnectorError::RetryExhausted { attempts: attempt };
            self.inner.bus.publish(
                Event::new(EventKind::RetryExhausted)
                    .with_attempt(attempt)
                    .with_reason(err.as_message()),
            );
            return RetryStep::Exhausted { attempts: attempt };
        }
        RetryStep::Pending { attempt }
    }

    /// Forwards an external display hotplug to the service.
    ///
    /// Events for other displays and repeats of the current state are
    /// accepted as no-ops. A disconnect clears the fixed-timing flag.
    pub async fn notify_hot_plug(
        &self,
        display: DisplayId,
        connected: bool,
    ) -> Result<(), ConnectorError> {
        let mut st = self.inner.state.lock().await;
        let observer = st
            .caps
            .as_ref()
            .map(|caps| Arc::clone(&caps.observer))
            .ok_or(ConnectorError::NotInitialized)?;

        if display != self.inner.cfg.external_display {
            self.publish_ignored(display, connected, "not the external display");
            return Ok(());
        }
        if connected == st.device_connected {
            self.publish_ignored(display, connected, "state unchanged");
            return Ok(());
        }

        if !connected {
            st.external_timing_fixed = false;
        }
        st.device_connected = connected;

        let res = observer
            .update_hdmi_connection_status(connected)
            .await
            .map_err(ConnectorError::from);

        let mut ev = Event::new(EventKind::HotplugForwarded).with_hotplug(display, connected);
        if let Err(e) = &res {
            ev = ev.with_reason(e.to_string());
        }
        self.inner.bus.publish(ev);
        res
    }

    /// Queries the source info of a video session into `out`.
    ///
    /// `out` is left untouched unless the remote query succeeds. An absent
    /// `out` fails with [`ConnectorError::InvalidArgument`] before any remote
    /// call is made.
    pub async fn get_video_source_info(
        &self,
        session: SessionId,
        out: Option<&mut VideoSourceInfo>,
    ) -> Result<(), ConnectorError> {
        let st = self.inner.state.lock().await;
        let info = st
            .caps
            .as_ref()
            .map(|caps| Arc::clone(&caps.info))
            .ok_or(ConnectorError::NotInitialized)?;
        let Some(out) = out else {
            return Err(ConnectorError::InvalidArgument {
                reason: "missing output target",
            });
        };

        let remote = info.get_video_source_info(session).await?;
        *out = remote.into();
        Ok(())
    }

    /// Returns the source info of a video session.
    pub async fn video_source_info(
        &self,
        session: SessionId,
    ) -> Result<VideoSourceInfo, ConnectorError> {
        let mut info = VideoSourceInfo::default();
        self.get_video_source_info(session, Some(&mut info)).await?;
        Ok(info)
    }

    /// Number of active video sessions; 0 while unbound.
    pub async fn get_video_session_number(&self) -> u32 {
        let st = self.inner.state.lock().await;
        match &st.caps {
            Some(caps) => caps.info.get_video_session_number().await,
            None => 0,
        }
    }

    /// True once the service requested an explicit timing for the external display.
    pub async fn is_external_device_timing_fixed(&self) -> bool {
        self.inner.state.lock().await.external_timing_fixed
    }

    /// Last known physical connection state of the external display.
    pub async fn is_device_connected(&self) -> bool {
        self.inner.state.lock().await.device_connected
    }

    /// Coarse lifecycle state.
    pub async fn state(&self) -> ConnectorState {
        self.inner.state.lock().await.lifecycle()
    }

    /// Bridge registered with the service, while bound.
    pub async fn bound_bridge(&self) -> Option<Arc<CallbackBridge>> {
        let st = self.inner.state.lock().await;
        st.caps.as_ref().map(|caps| Arc::clone(&caps.bridge))
    }

    // ---- Forwarding entry points (called by CallbackBridge) ----

    pub(crate) async fn on_blank_request(&self, blank: bool) {
        let _st = self.inner.state.lock().await;
        self.inner.pipeline.analyzer.post_blank_event(blank);
        self.inner
            .bus
            .publish(Event::new(EventKind::BlankRequested).with_flag(blank));
    }

    pub(crate) async fn on_video_state_change(&self, session: SessionId, state: VideoState) {
        let _st = self.inner.state.lock().await;
        let preparing = state.is_preparing();
        let playing = state.is_playing();
        self.inner
            .pipeline
            .analyzer
            .post_video_event(session, preparing, playing);
        self.inner.bus.publish(
            Event::new(EventKind::VideoStateChanged)
                .with_session(session)
                .with_reason(format!("{state:?} preparing={preparing} playing={playing}")),
        );
    }

    /// Applies the requested timing to the external device, if attached, and
    /// records that an explicit timing was requested either way.
    pub(crate) async fn on_timing_request(&self, timing: HdmiTiming) {
        let mut st = self.inner.state.lock().await;
        let mode = timing.to_mode();
        let applied = match self
            .inner
            .pipeline
            .devices
            .external_device(self.inner.cfg.external_display)
        {
            Some(device) => device.set_mode(&mode),
            None => false,
        };
        st.external_timing_fixed = true;
        self.inner.bus.publish(
            Event::new(EventKind::TimingRequested)
                .with_reason(mode.to_string())
                .with_flag(applied),
        );
    }

    // ---- Internals (lock held by caller) ----

    async fn service_running(&self) -> bool {
        self.inner
            .directory
            .check_service(&self.inner.cfg.service_name)
            .await
    }

    async fn bind_locked(&self, st: &mut Shared) -> Result<(), ConnectorError> {
        let res = bind::bind(
            self.inner.directory.as_ref(),
            &self.inner.cfg.service_name,
            Arc::downgrade(&self.inner),
            &self.inner.bus,
        )
        .await;

        match res {
            Ok(caps) => {
                st.device_connected = self
                    .inner
                    .pipeline
                    .driver
                    .is_connected(self.inner.cfg.external_display);
                st.caps = Some(caps);
                self.inner
                    .bus
                    .publish(Event::new(EventKind::BindSucceeded).with_flag(st.device_connected));
                Ok(())
            }
            Err(e) => {
                self.inner
                    .bus
                    .publish(Event::new(EventKind::BindFailed).with_reason(e.as_message()));
                Err(e)
            }
        }
    }

    async fn unbind_locked(&self, st: &mut Shared) {
        if let Some(caps) = st.caps.take() {
            bind::release(caps).await;
            self.inner.bus.publish(Event::new(EventKind::Unbound));
        }
        st.device_connected = false;
        st.external_timing_fixed = false;
    }

    /// Spawns the retry worker unless one is already attached.
    fn start_worker(&self, st: &mut Shared) -> bool {
        if st.worker.is_some() {
            return true;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return false;
        };

        st.retry_attempts = 0;
        let token = CancellationToken::new();
        let worker = RetryWorker::new(
            Arc::downgrade(&self.inner),
            token.clone(),
            self.inner.cfg.poll,
            self.inner.bus.clone(),
        );
        let join = runtime.spawn(worker.run());
        st.worker = Some(WorkerHandle { token, join });
        self.inner.bus.publish(Event::new(EventKind::RetryStarted));
        true
    }

    fn publish_ignored(&self, display: DisplayId, connected: bool, reason: &'static str) {
        self.inner.bus.publish(
            Event::new(EventKind::HotplugIgnored)
                .with_hotplug(display, connected)
                .with_reason(reason),
        );
    }
}

impl std::fmt::Debug for ServiceConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConnector")
            .field("service_name", &self.inner.cfg.service_name)
            .finish_non_exhaustive()
    }
}
