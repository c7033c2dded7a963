//! Remote service boundary: capability traits and the values they carry.
//!
//! ## Contents
//! - [`ServiceDirectory`], [`DisplayService`] lookup of the service by name
//! - [`CallbackRegistrar`], [`VideoInfoProvider`], [`ConnectionObserver`] the three capabilities
//! - [`DisplayCallback`] push notifications implemented by the connector
//! - [`VideoState`], [`HdmiTiming`], [`ScalingType`], video source records

mod callback;
mod service;
mod types;

pub use callback::{CallbackRef, DisplayCallback};
pub use service::{
    CallbackRegistrar, ConnectionObserver, DisplayService, ServiceDirectory, VideoInfoProvider,
};
pub use types::{
    HdmiTiming, RemoteVideoSourceInfo, ScalingType, SessionId, VideoSourceInfo, VideoState,
};
