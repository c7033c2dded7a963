//! # Bind transaction.
//!
//! Acquires the three remote capabilities and registers a fresh
//! [`CallbackBridge`] as one all-or-nothing step.
//!
//! ```text
//! get_service(name) ─► callback_registrar ─► register(bridge) ─► info_provider ─► connection_observer
//!        │                    │                   │                   │                  │
//!        └── Err(Lookup)      └── Err(Registrar)  └── Err(Register)   └── rollback ──────┴── rollback
//!                                                                        (unregister + detach bridge)
//! ```
//!
//! Nothing is written to the connector state here; the caller commits the
//! returned [`Capabilities`] only when every step succeeded.

use std::sync::{Arc, Weak};

use crate::core::bridge::CallbackBridge;
use crate::core::connector::Inner;
use crate::core::state::Capabilities;
use crate::error::{BindStage, ConnectorError};
use crate::events::Bus;
use crate::remote::{CallbackRef, CallbackRegistrar, ServiceDirectory};

/// Registrar and bridge staged before the remaining capabilities are known.
struct Staged {
    registrar: Arc<dyn CallbackRegistrar>,
    bridge: Arc<CallbackBridge>,
    callback: CallbackRef,
}

impl Staged {
    /// Undoes the registration of a partially bound set.
    async fn rollback(self) {
        self.bridge.detach();
        let _ = self.registrar.unregister_callback(&self.callback).await;
    }
}

fn failure(stage: BindStage, reason: impl Into<String>) -> ConnectorError {
    ConnectorError::BindFailure {
        stage,
        reason: reason.into(),
    }
}

/// Runs one bind transaction against `directory`.
///
/// On error every partial registration has already been rolled back.
pub(crate) async fn bind(
    directory: &dyn ServiceDirectory,
    service_name: &str,
    connector: Weak<Inner>,
    bus: &Bus,
) -> Result<Capabilities, ConnectorError> {
    let service = directory
        .get_service(service_name)
        .await
        .ok_or_else(|| failure(BindStage::Lookup, format!("no service named {service_name:?}")))?;

    let registrar = service
        .callback_registrar()
        .await
        .ok_or_else(|| failure(BindStage::Registrar, "callback registrar unavailable"))?;

    let bridge = Arc::new(CallbackBridge::new(connector, bus.clone()));
    let callback: CallbackRef = bridge.clone();
    if let Err(e) = registrar.register_callback(Arc::clone(&callback)).await {
        bridge.detach();
        return Err(failure(BindStage::Register, e.to_string()));
    }
    let staged = Staged {
        registrar,
        bridge,
        callback,
    };

    let Some(info) = service.info_provider().await else {
        staged.rollback().await;
        return Err(failure(BindStage::InfoProvider, "video info provider unavailable"));
    };
    let Some(observer) = service.connection_observer().await else {
        staged.rollback().await;
        return Err(failure(
            BindStage::ConnectionObserver,
            "connection observer unavailable",
        ));
    };

    Ok(Capabilities {
        registrar: staged.registrar,
        info,
        observer,
        bridge: staged.bridge,
        callback: staged.callback,
    })
}

/// Releases a committed capability set, unregistering the bridge first.
pub(crate) async fn release(caps: Capabilities) {
    caps.bridge.detach();
    let _ = caps.registrar.unregister_callback(&caps.callback).await;
}
