//! In-memory doubles for the remote service and the local pipeline.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::ConnectorConfig;
use crate::core::ServiceConnector;
use crate::error::RemoteError;
use crate::pipeline::{
    DisplayAnalyzer, DisplayDeviceRegistry, DisplayDriver, DisplayId, DisplayMode, ExternalDevice,
    LocalPipeline,
};
use crate::policies::PollPolicy;
use crate::remote::{
    CallbackRef, CallbackRegistrar, ConnectionObserver, DisplayService, RemoteVideoSourceInfo,
    ServiceDirectory, SessionId, VideoInfoProvider,
};
use crate::subscribers::Subscribe;

// ---- remote side ----

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceFault {
    None,
    NoRegistrar,
    RejectRegistration,
    NoInfoProvider,
    NoConnectionObserver,
}

pub struct FakeDirectory {
    running: AtomicBool,
    probes: AtomicUsize,
    lookups: AtomicUsize,
    pub service: Arc<FakeService>,
}

impl FakeDirectory {
    fn with_running(running: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            probes: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
            service: Arc::new(FakeService::default()),
        }
    }

    pub fn running() -> Self {
        Self::with_running(true)
    }

    pub fn stopped() -> Self {
        Self::with_running(false)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Number of `check_service` calls.
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of `get_service` calls.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceDirectory for FakeDirectory {
    async fn check_service(&self, _name: &str) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.running.load(Ordering::SeqCst)
    }

    async fn get_service(&self, _name: &str) -> Option<Arc<dyn DisplayService>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.running.load(Ordering::SeqCst) {
            Some(self.service.clone())
        } else {
            None
        }
    }
}

pub struct FakeService {
    fault: Mutex<ServiceFault>,
    pub registrar: Arc<FakeRegistrar>,
    pub info: Arc<FakeInfo>,
    pub observer: Arc<FakeObserver>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            fault: Mutex::new(ServiceFault::None),
            registrar: Arc::new(FakeRegistrar::default()),
            info: Arc::new(FakeInfo::default()),
            observer: Arc::new(FakeObserver::default()),
        }
    }
}

impl FakeService {
    pub fn set_fault(&self, fault: ServiceFault) {
        *self.fault.lock().unwrap() = fault;
        self.registrar
            .reject
            .store(fault == ServiceFault::RejectRegistration, Ordering::SeqCst);
    }

    fn fault(&self) -> ServiceFault {
        *self.fault.lock().unwrap()
    }
}

#[async_trait]
impl DisplayService for FakeService {
    async fn callback_registrar(&self) -> Option<Arc<dyn CallbackRegistrar>> {
        (self.fault() != ServiceFault::NoRegistrar)
            .then(|| self.registrar.clone() as Arc<dyn CallbackRegistrar>)
    }

    async fn info_provider(&self) -> Option<Arc<dyn VideoInfoProvider>> {
        (self.fault() != ServiceFault::NoInfoProvider)
            .then(|| self.info.clone() as Arc<dyn VideoInfoProvider>)
    }

    async fn connection_observer(&self) -> Option<Arc<dyn ConnectionObserver>> {
        (self.fault() != ServiceFault::NoConnectionObserver)
            .then(|| self.observer.clone() as Arc<dyn ConnectionObserver>)
    }
}

#[derive(Default)]
pub struct FakeRegistrar {
    callbacks: Mutex<Vec<CallbackRef>>,
    unregister_calls: AtomicUsize,
    reject: AtomicBool,
}

impl FakeRegistrar {
    pub fn registered_count(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    pub fn unregister_calls(&self) -> usize {
        self.unregister_calls.load(Ordering::SeqCst)
    }

    pub fn latest(&self) -> Option<CallbackRef> {
        self.callbacks.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CallbackRegistrar for FakeRegistrar {
    async fn register_callback(&self, callback: CallbackRef) -> Result<(), RemoteError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(RemoteError::Status { code: -1 });
        }
        self.callbacks.lock().unwrap().push(callback);
        Ok(())
    }

    async fn unregister_callback(&self, callback: &CallbackRef) -> Result<(), RemoteError> {
        self.unregister_calls.fetch_add(1, Ordering::SeqCst);
        let mut callbacks = self.callbacks.lock().unwrap();
        let before = callbacks.len();
        callbacks.retain(|cb| !Arc::ptr_eq(cb, callback));
        if callbacks.len() == before {
            Err(RemoteError::Unavailable)
        } else {
            Ok(())
        }
    }
}

pub struct FakeInfo {
    sessions: AtomicU32,
    source: Mutex<Result<RemoteVideoSourceInfo, RemoteError>>,
    source_queries: AtomicUsize,
}

impl Default for FakeInfo {
    fn default() -> Self {
        Self {
            sessions: AtomicU32::new(0),
            source: Mutex::new(Ok(RemoteVideoSourceInfo::default())),
            source_queries: AtomicUsize::new(0),
        }
    }
}

impl FakeInfo {
    pub fn set_sessions(&self, n: u32) {
        self.sessions.store(n, Ordering::SeqCst);
    }

    pub fn set_source(&self, source: Result<RemoteVideoSourceInfo, RemoteError>) {
        *self.source.lock().unwrap() = source;
    }

    pub fn source_queries(&self) -> usize {
        self.source_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoInfoProvider for FakeInfo {
    async fn get_video_source_info(
        &self,
        _session: SessionId,
    ) -> Result<RemoteVideoSourceInfo, RemoteError> {
        self.source_queries.fetch_add(1, Ordering::SeqCst);
        self.source.lock().unwrap().clone()
    }

    async fn get_video_session_number(&self) -> u32 {
        self.sessions.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeObserver {
    updates: Mutex<Vec<bool>>,
    failure: Mutex<Option<RemoteError>>,
}

impl FakeObserver {
    pub fn updates(&self) -> Vec<bool> {
        self.updates.lock().unwrap().clone()
    }

    pub fn fail_with(&self, err: RemoteError) {
        *self.failure.lock().unwrap() = Some(err);
    }
}

#[async_trait]
impl ConnectionObserver for FakeObserver {
    async fn update_hdmi_connection_status(&self, connected: bool) -> Result<(), RemoteError> {
        self.updates.lock().unwrap().push(connected);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ---- local side ----

#[derive(Default)]
pub struct FakeAnalyzer {
    blanks: Mutex<Vec<bool>>,
    videos: Mutex<Vec<(SessionId, bool, bool)>>,
}

impl FakeAnalyzer {
    pub fn blank_events(&self) -> Vec<bool> {
        self.blanks.lock().unwrap().clone()
    }

    pub fn video_events(&self) -> Vec<(SessionId, bool, bool)> {
        self.videos.lock().unwrap().clone()
    }
}

impl DisplayAnalyzer for FakeAnalyzer {
    fn post_blank_event(&self, blank: bool) {
        self.blanks.lock().unwrap().push(blank);
    }

    fn post_video_event(&self, session: SessionId, preparing: bool, playing: bool) {
        self.videos.lock().unwrap().push((session, preparing, playing));
    }
}

#[derive(Default)]
pub struct FakeDevice {
    modes: Mutex<Vec<DisplayMode>>,
}

impl ExternalDevice for FakeDevice {
    fn set_mode(&self, mode: &DisplayMode) -> bool {
        self.modes.lock().unwrap().push(*mode);
        true
    }
}

#[derive(Default)]
pub struct FakeDevices {
    device: Mutex<Option<Arc<FakeDevice>>>,
}

impl FakeDevices {
    pub fn attach(&self) {
        *self.device.lock().unwrap() = Some(Arc::new(FakeDevice::default()));
    }

    pub fn applied_modes(&self) -> Vec<DisplayMode> {
        self.device
            .lock()
            .unwrap()
            .as_ref()
            .map(|d| d.modes.lock().unwrap().clone())
            .unwrap_or_default()
    }
}

impl DisplayDeviceRegistry for FakeDevices {
    fn external_device(&self, id: DisplayId) -> Option<Arc<dyn ExternalDevice>> {
        if id != DisplayId::EXTERNAL {
            return None;
        }
        self.device
            .lock()
            .unwrap()
            .clone()
            .map(|d| d as Arc<dyn ExternalDevice>)
    }
}

#[derive(Default)]
pub struct FakeDriver {
    connected: AtomicBool,
}

impl FakeDriver {
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl DisplayDriver for FakeDriver {
    fn is_connected(&self, id: DisplayId) -> bool {
        id == DisplayId::EXTERNAL && self.connected.load(Ordering::SeqCst)
    }
}

// ---- wiring ----

pub struct Harness {
    pub connector: ServiceConnector,
    pub directory: Arc<FakeDirectory>,
    pub analyzer: Arc<FakeAnalyzer>,
    pub devices: Arc<FakeDevices>,
    pub driver: Arc<FakeDriver>,
}

impl Harness {
    fn build(
        directory: FakeDirectory,
        cfg: ConnectorConfig,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let directory = Arc::new(directory);
        let analyzer = Arc::new(FakeAnalyzer::default());
        let devices = Arc::new(FakeDevices::default());
        let driver = Arc::new(FakeDriver::default());
        let pipeline = LocalPipeline::new(analyzer.clone(), devices.clone(), driver.clone());

        let connector = ServiceConnector::builder(cfg)
            .with_subscribers(subscribers)
            .build(directory.clone(), pipeline);

        Self {
            connector,
            directory,
            analyzer,
            devices,
            driver,
        }
    }

    pub fn running() -> Self {
        Self::build(FakeDirectory::running(), ConnectorConfig::default(), Vec::new())
    }

    pub fn running_with_subscribers(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self::build(FakeDirectory::running(), ConnectorConfig::default(), subscribers)
    }

    pub fn stopped() -> Self {
        Self::build(FakeDirectory::stopped(), ConnectorConfig::default(), Vec::new())
    }

    pub fn stopped_with_attempts(max_attempts: u32) -> Self {
        let cfg = ConnectorConfig {
            poll: PollPolicy {
                max_attempts,
                ..PollPolicy::default()
            },
            ..ConnectorConfig::default()
        };
        Self::build(FakeDirectory::stopped(), cfg, Vec::new())
    }

    /// Callback most recently registered with the fake service.
    pub fn registered_callback(&self) -> CallbackRef {
        self.directory
            .service
            .registrar
            .latest()
            .expect("a registered callback")
    }
}
