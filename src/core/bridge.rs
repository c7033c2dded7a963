//! # CallbackBridge: remote push notifications into the connector.
//!
//! One bridge is created per bind attempt and registered with the service's
//! callback registrar. It holds only a `Weak` reference to the connector and
//! is detached before it is unregistered, so a notification racing with
//! teardown is answered with [`ConnectorError::NotInitialized`] instead of
//! reaching a released connector.
//!
//! ```text
//! service ──► blank_secondary_display ──► ServiceConnector::on_blank_request
//!         ──► update_video_state      ──► ServiceConnector::on_video_state_change
//!         ──► set_hdmi_timing         ──► ServiceConnector::on_timing_request
//!         ──► update_input_state      ──► InputStateChanged event only
//!         ──► set_hdmi_scaling_type   ──► Err(Unsupported)
//!         ──► set_hdmi_overscan       ──► Err(Unsupported)
//! ```

use std::sync::Weak;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;

use crate::core::connector::{Inner, ServiceConnector};
use crate::error::ConnectorError;
use crate::events::{Bus, Event, EventKind};
use crate::remote::{DisplayCallback, HdmiTiming, ScalingType, SessionId, VideoState};

/// Implementation of the remote callback capability.
pub struct CallbackBridge {
    connector: Weak<Inner>,
    bus: Bus,
    video_state: AtomicI32,
    detached: AtomicBool,
}

impl CallbackBridge {
    pub(crate) fn new(connector: Weak<Inner>, bus: Bus) -> Self {
        Self {
            connector,
            bus,
            video_state: AtomicI32::new(VideoState::Unknown.as_raw()),
            detached: AtomicBool::new(false),
        }
    }

    /// Last video state pushed by the service (diagnostic only).
    pub fn last_video_state(&self) -> VideoState {
        VideoState::from_raw(self.video_state.load(Ordering::Relaxed))
    }

    /// True once the bridge has been unregistered (or its bind rolled back).
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::Release);
    }

    fn connector(&self) -> Result<ServiceConnector, ConnectorError> {
        if self.is_detached() {
            return Err(ConnectorError::NotInitialized);
        }
        self.connector
            .upgrade()
            .map(ServiceConnector::from_inner)
            .ok_or(ConnectorError::NotInitialized)
    }

    fn unsupported(&self, operation: &'static str) -> Result<(), ConnectorError> {
        self.bus
            .publish(Event::new(EventKind::UnsupportedRequest).with_reason(operation));
        Err(ConnectorError::Unsupported { operation })
    }
}

#[async_trait]
impl DisplayCallback for CallbackBridge {
    async fn blank_secondary_display(&self, blank: bool) -> Result<(), ConnectorError> {
        self.connector()?.on_blank_request(blank).await;
        Ok(())
    }

    async fn update_video_state(
        &self,
        session: SessionId,
        state: VideoState,
    ) -> Result<(), ConnectorError> {
        self.video_state.store(state.as_raw(), Ordering::Relaxed);
        self.connector()?.on_video_state_change(session, state).await;
        Ok(())
    }

    async fn set_hdmi_timing(&self, timing: HdmiTiming) -> Result<(), ConnectorError> {
        self.connector()?.on_timing_request(timing).await;
        Ok(())
    }

    async fn update_input_state(&self, active: bool) -> Result<(), ConnectorError> {
        self.bus
            .publish(Event::new(EventKind::InputStateChanged).with_flag(active));
        Ok(())
    }

    async fn set_hdmi_scaling_type(&self, _scaling: ScalingType) -> Result<(), ConnectorError> {
        self.unsupported("set_hdmi_scaling_type")
    }

    async fn set_hdmi_overscan(&self, _h: i32, _v: i32) -> Result<(), ConnectorError> {
        self.unsupported("set_hdmi_overscan")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    fn orphan() -> CallbackBridge {
        CallbackBridge::new(Weak::new(), Bus::new(8))
    }

    #[tokio::test]
    async fn unsupported_requests_are_distinguishable() {
        let bridge = orphan();
        let scaling = bridge.set_hdmi_scaling_type(ScalingType::Aspect).await;
        let overscan = bridge.set_hdmi_overscan(3, 3).await;

        assert!(scaling.unwrap_err().is_unsupported());
        assert!(overscan.unwrap_err().is_unsupported());
    }

    #[tokio::test]
    async fn input_state_is_acknowledged_without_connector() {
        assert_eq!(orphan().update_input_state(true).await, Ok(()));
    }

    #[tokio::test]
    async fn orphaned_bridge_rejects_forwarding() {
        let bridge = orphan();
        assert_eq!(
            bridge.blank_secondary_display(true).await,
            Err(ConnectorError::NotInitialized)
        );
        assert_eq!(bridge.last_video_state(), VideoState::Unknown);
    }

    #[tokio::test]
    async fn video_state_is_recorded_and_forwarded() {
        let h = Harness::running();
        assert!(h.connector.initialize().await);
        let cb = h.registered_callback();

        cb.update_video_state(7, VideoState::Preparing).await.unwrap();
        cb.update_video_state(7, VideoState::Playing).await.unwrap();
        cb.update_video_state(7, VideoState::Unprepared).await.unwrap();

        assert_eq!(
            h.analyzer.video_events(),
            vec![(7, true, true), (7, false, true), (7, false, false)]
        );
        let bound = h.connector.bound_bridge().await.expect("bridge");
        assert_eq!(bound.last_video_state(), VideoState::Unprepared);
    }

    #[tokio::test]
    async fn blank_request_reaches_analyzer() {
        let h = Harness::running();
        assert!(h.connector.initialize().await);
        let cb = h.registered_callback();

        cb.blank_secondary_display(true).await.unwrap();
        cb.blank_secondary_display(false).await.unwrap();

        assert_eq!(h.analyzer.blank_events(), vec![true, false]);
    }

    #[tokio::test]
    async fn timing_request_reaches_device() {
        let h = Harness::running();
        h.devices.attach();
        assert!(h.connector.initialize().await);
        let cb = h.registered_callback();

        let timing = HdmiTiming {
            width: 1920,
            height: 1080,
            refresh: 60,
            flags: 0,
        };
        cb.set_hdmi_timing(timing).await.unwrap();

        assert_eq!(h.devices.applied_modes(), vec![timing.to_mode()]);
        assert!(h.connector.is_external_device_timing_fixed().await);
    }

    #[tokio::test]
    async fn stale_bridge_is_rejected_after_deinitialize() {
        let h = Harness::running();
        assert!(h.connector.initialize().await);
        let cb = h.registered_callback();

        h.connector.deinitialize().await;

        assert_eq!(
            cb.blank_secondary_display(true).await,
            Err(ConnectorError::NotInitialized)
        );
        assert!(h.analyzer.blank_events().is_empty());
    }
}
