//! # Remote service capabilities.
//!
//! The multi-display service is an opaque peer. It is found by name in a
//! process-wide [`ServiceDirectory`] and exposes three capabilities:
//!
//! ```text
//! ServiceDirectory ──get_service(name)──► DisplayService
//!                                            ├─► CallbackRegistrar   (register / unregister bridge)
//!                                            ├─► VideoInfoProvider   (source info, session count)
//!                                            └─► ConnectionObserver  (HDMI connection status)
//! ```
//!
//! `check_service` is the cheap existence probe used before a full lookup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::remote::callback::CallbackRef;
use crate::remote::types::{RemoteVideoSourceInfo, SessionId};

/// Process-wide directory of named services.
#[async_trait]
pub trait ServiceDirectory: Send + Sync + 'static {
    /// True if a service is currently registered under `name`.
    async fn check_service(&self, name: &str) -> bool;

    /// Full lookup of the service registered under `name`.
    async fn get_service(&self, name: &str) -> Option<Arc<dyn DisplayService>>;
}

/// Handle to the multi-display service.
#[async_trait]
pub trait DisplayService: Send + Sync + 'static {
    async fn callback_registrar(&self) -> Option<Arc<dyn CallbackRegistrar>>;
    async fn info_provider(&self) -> Option<Arc<dyn VideoInfoProvider>>;
    async fn connection_observer(&self) -> Option<Arc<dyn ConnectionObserver>>;
}

/// Registration point for push notifications.
#[async_trait]
pub trait CallbackRegistrar: Send + Sync + 'static {
    async fn register_callback(&self, callback: CallbackRef) -> Result<(), RemoteError>;
    async fn unregister_callback(&self, callback: &CallbackRef) -> Result<(), RemoteError>;
}

/// Video session queries.
#[async_trait]
pub trait VideoInfoProvider: Send + Sync + 'static {
    async fn get_video_source_info(
        &self,
        session: SessionId,
    ) -> Result<RemoteVideoSourceInfo, RemoteError>;

    async fn get_video_session_number(&self) -> u32;
}

/// Receiver of local HDMI connection changes.
#[async_trait]
pub trait ConnectionObserver: Send + Sync + 'static {
    async fn update_hdmi_connection_status(&self, connected: bool) -> Result<(), RemoteError>;
}
