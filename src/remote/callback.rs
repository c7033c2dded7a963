//! # Callback capability implemented on our side.
//!
//! The service pushes notifications through a [`DisplayCallback`] registered
//! with its [`CallbackRegistrar`](crate::remote::CallbackRegistrar). The
//! connector's implementation is [`CallbackBridge`](crate::CallbackBridge).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConnectorError;
use crate::remote::types::{HdmiTiming, ScalingType, SessionId, VideoState};

/// Shared handle to a registered callback.
pub type CallbackRef = Arc<dyn DisplayCallback>;

/// Push notifications from the multi-display service.
///
/// Every method returns a result; [`ConnectorError::Unsupported`] marks a
/// request the product variant deliberately does not implement.
#[async_trait]
pub trait DisplayCallback: Send + Sync + 'static {
    /// Blank (`true`) or unblank the secondary display.
    async fn blank_secondary_display(&self, blank: bool) -> Result<(), ConnectorError>;

    /// Playback state change of a video session.
    async fn update_video_state(
        &self,
        session: SessionId,
        state: VideoState,
    ) -> Result<(), ConnectorError>;

    /// Preferred timing for the external display.
    async fn set_hdmi_timing(&self, timing: HdmiTiming) -> Result<(), ConnectorError>;

    /// Input device activity change.
    async fn update_input_state(&self, active: bool) -> Result<(), ConnectorError>;

    /// Scaling mode for the external display.
    async fn set_hdmi_scaling_type(&self, scaling: ScalingType) -> Result<(), ConnectorError>;

    /// Overscan compensation for the external display.
    async fn set_hdmi_overscan(&self, h: i32, v: i32) -> Result<(), ConnectorError>;
}
