//! # Local display pipeline boundary.
//!
//! The connector never owns the display pipeline; it talks to three injected
//! collaborators bundled in [`LocalPipeline`]:
//!
//! ```text
//!   ServiceConnector
//!        ├─► DisplayAnalyzer        post_blank_event / post_video_event
//!        ├─► DisplayDeviceRegistry  device(EXTERNAL) ─► ExternalDevice::set_mode
//!        └─► DisplayDriver          is_connected(EXTERNAL)   (once per bind)
//! ```
//!
//! All calls are synchronous and made while the connector lock is held;
//! implementations must not call back into the connector.

use std::fmt;
use std::sync::Arc;

use crate::remote::SessionId;

/// Logical display identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub u32);

impl DisplayId {
    /// Built-in panel.
    pub const PRIMARY: DisplayId = DisplayId(0);
    /// HDMI / external output.
    pub const EXTERNAL: DisplayId = DisplayId(1);
    /// Virtual (wireless / recording) display.
    pub const VIRTUAL: DisplayId = DisplayId(2);
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DisplayId::PRIMARY => f.write_str("primary"),
            DisplayId::EXTERNAL => f.write_str("external"),
            DisplayId::VIRTUAL => f.write_str("virtual"),
            DisplayId(n) => write!(f, "display#{n}"),
        }
    }
}

/// Display mode applied to the external device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayMode {
    /// Horizontal active pixels.
    pub hdisplay: u32,
    /// Vertical active lines.
    pub vdisplay: u32,
    /// Refresh rate in Hz.
    pub vrefresh: u32,
    /// Mode flags (interlace, sync polarity, aspect ratio), passed through.
    pub flags: u32,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{}Hz", self.hdisplay, self.vdisplay, self.vrefresh)
    }
}

/// Consumer of blank and video-playback notifications.
pub trait DisplayAnalyzer: Send + Sync + 'static {
    /// Requests blanking (`true`) or unblanking of the secondary display.
    fn post_blank_event(&self, blank: bool);

    /// Reports the playback state of a video session.
    fn post_video_event(&self, session: SessionId, preparing: bool, playing: bool);
}

/// Attached external display device.
pub trait ExternalDevice: Send + Sync + 'static {
    /// Applies a display mode. Returns `false` if the device rejected it.
    fn set_mode(&self, mode: &DisplayMode) -> bool;
}

/// Registry of display devices by logical id.
pub trait DisplayDeviceRegistry: Send + Sync + 'static {
    /// Returns the device for `id` if one is currently attached.
    fn external_device(&self, id: DisplayId) -> Option<Arc<dyn ExternalDevice>>;
}

/// Driver-level connection query.
pub trait DisplayDriver: Send + Sync + 'static {
    /// True if the display is physically connected.
    fn is_connected(&self, id: DisplayId) -> bool;
}

/// Local collaborators injected into the connector.
#[derive(Clone)]
pub struct LocalPipeline {
    /// Blank / video event sink.
    pub analyzer: Arc<dyn DisplayAnalyzer>,
    /// Device lookup for mode setting.
    pub devices: Arc<dyn DisplayDeviceRegistry>,
    /// Physical connection query.
    pub driver: Arc<dyn DisplayDriver>,
}

impl LocalPipeline {
    /// Bundles the three collaborators.
    pub fn new(
        analyzer: Arc<dyn DisplayAnalyzer>,
        devices: Arc<dyn DisplayDeviceRegistry>,
        driver: Arc<dyn DisplayDriver>,
    ) -> Self {
        Self {
            analyzer,
            devices,
            driver,
        }
    }
}

impl fmt::Debug for LocalPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPipeline").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_id_names() {
        assert_eq!(DisplayId::EXTERNAL.to_string(), "external");
        assert_eq!(DisplayId(7).to_string(), "display#7");
    }

    #[test]
    fn mode_formats_as_timing() {
        let mode = DisplayMode {
            hdisplay: 1920,
            vdisplay: 1080,
            vrefresh: 60,
            flags: 0,
        };
        assert_eq!(mode.to_string(), "1920x1080@60Hz");
    }
}
