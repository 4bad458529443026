//! Reader configuration and speed bounds.

use crate::cadence::CadenceProfile;

pub const MIN_WPM: u16 = 250;
pub const MAX_WPM: u16 = 1_200;
pub const DEFAULT_WPM: u16 = 600;
pub const HEARTBEAT_INTERVAL_MS: u64 = 16;

/// Initial session settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderConfig {
    pub wpm: u16,
    pub cadence_profile: CadenceProfile,
    /// Period of the heartbeat that checks the advance deadline.
    pub heartbeat_interval_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            cadence_profile: CadenceProfile::Normal,
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
        }
    }
}

impl ReaderConfig {
    pub const fn with_wpm(mut self, wpm: u16) -> Self {
        self.wpm = wpm;
        self
    }

    pub const fn with_cadence_profile(mut self, cadence_profile: CadenceProfile) -> Self {
        self.cadence_profile = cadence_profile;
        self
    }

    pub const fn with_heartbeat_interval_ms(mut self, heartbeat_interval_ms: u64) -> Self {
        self.heartbeat_interval_ms = heartbeat_interval_ms;
        self
    }

    /// Copy with wpm clamped into range and a non-zero heartbeat interval.
    pub fn normalized(self) -> Self {
        Self {
            wpm: clamp_wpm(u32::from(self.wpm)),
            heartbeat_interval_ms: self.heartbeat_interval_ms.max(1),
            ..self
        }
    }
}

/// Clamps any requested speed into `[MIN_WPM, MAX_WPM]`.
pub fn clamp_wpm(wpm: u32) -> u16 {
    wpm.clamp(u32::from(MIN_WPM), u32::from(MAX_WPM)) as u16
}
