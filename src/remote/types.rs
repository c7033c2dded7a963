//! Value types exchanged with the remote display service.

use crate::pipeline::DisplayMode;

/// Video session identifier assigned by the remote service.
pub type SessionId = i32;

/// Playback state of a video session, as pushed by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VideoState {
    /// No state reported yet.
    #[default]
    Unknown = 0,
    /// Decoder is being set up.
    Preparing = 1,
    /// Decoder ready, playback not started.
    Prepared = 2,
    /// Playback running.
    Playing = 3,
    /// Playback paused.
    Paused = 4,
    /// Playback stopped, decoder still allocated.
    Stopped = 5,
    /// Decoder is being torn down.
    Unpreparing = 6,
    /// Session fully released.
    Unprepared = 7,
}

impl VideoState {
    /// Decodes the raw wire value; unknown values map to [`VideoState::Unknown`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => VideoState::Preparing,
            2 => VideoState::Prepared,
            3 => VideoState::Playing,
            4 => VideoState::Paused,
            5 => VideoState::Stopped,
            6 => VideoState::Unpreparing,
            7 => VideoState::Unprepared,
            _ => VideoState::Unknown,
        }
    }

    /// Raw wire value.
    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// True while the session is transitioning in or out of playback.
    #[inline]
    pub fn is_preparing(self) -> bool {
        matches!(self, VideoState::Preparing | VideoState::Unpreparing)
    }

    /// True for every state except the fully released one.
    #[inline]
    pub fn is_playing(self) -> bool {
        self != VideoState::Unprepared
    }
}

/// HDMI scaling mode requested by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingType {
    #[default]
    None,
    FullScreen,
    Center,
    Aspect,
}

/// Preferred HDMI timing pushed by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HdmiTiming {
    pub width: u32,
    pub height: u32,
    pub refresh: u32,
    pub flags: u32,
}

impl HdmiTiming {
    /// Translates the remote timing into a local display mode.
    pub fn to_mode(&self) -> DisplayMode {
        DisplayMode {
            hdisplay: self.width,
            vdisplay: self.height,
            vrefresh: self.refresh,
            flags: self.flags,
        }
    }
}

/// Video source description as reported by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemoteVideoSourceInfo {
    pub display_w: u32,
    pub display_h: u32,
    pub frame_rate: u32,
    pub interlaced: bool,
    pub protected: bool,
}

/// Video source resolution and frame rate handed back to callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoSourceInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl From<RemoteVideoSourceInfo> for VideoSourceInfo {
    fn from(info: RemoteVideoSourceInfo) -> Self {
        Self {
            width: info.display_w,
            height: info.display_h,
            frame_rate: info.frame_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preparing_covers_both_transitions() {
        assert!(VideoState::Preparing.is_preparing());
        assert!(VideoState::Unpreparing.is_preparing());
        assert!(!VideoState::Playing.is_preparing());
        assert!(!VideoState::Unprepared.is_preparing());
    }

    #[test]
    fn only_unprepared_is_not_playing() {
        for raw in 0..=7 {
            let state = VideoState::from_raw(raw);
            assert_eq!(state.is_playing(), state != VideoState::Unprepared);
        }
    }

    #[test]
    fn raw_values_decode() {
        assert_eq!(VideoState::from_raw(3), VideoState::Playing);
        assert_eq!(VideoState::from_raw(42), VideoState::Unknown);
        assert_eq!(VideoState::Unpreparing.as_raw(), 6);
    }

    #[test]
    fn timing_maps_to_mode() {
        let timing = HdmiTiming {
            width: 1280,
            height: 720,
            refresh: 50,
            flags: 0x5,
        };
        let mode = timing.to_mode();
        assert_eq!((mode.hdisplay, mode.vdisplay, mode.vrefresh, mode.flags), (1280, 720, 50, 0x5));
    }
}
