//! The clock's persistent state record.

use serde::{Deserialize, Serialize};

use crate::format::TimeFormat;
use crate::speed::Speed;

/// Everything the clock needs to resume where it left off.
///
/// The JSON shape is camelCase so records written by earlier releases of
/// the widget load unchanged:
///
/// ```json
/// {"isRunning":false,"seconds":3,"format":"clock","displayFormats":false,"speed":"2x","displaySpeeds":false}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    /// Whether the tick source is active.
    pub is_running: bool,
    /// Accumulated ticks.
    pub seconds: u64,
    /// Current display format.
    pub format: TimeFormat,
    /// Whether the format picker is open.
    pub display_formats: bool,
    /// Current tick rate.
    pub speed: Speed,
    /// Whether the speed picker is open.
    pub display_speeds: bool,
}

/// A possibly incomplete [`ClockState`] read back from storage.
///
/// Fields absent from the stored record stay `None` and fall back to the
/// defaults when merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    /// Stored running flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// Stored tick count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
    /// Stored display format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TimeFormat>,
    /// Stored format picker flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_formats: Option<bool>,
    /// Stored tick rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    /// Stored speed picker flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_speeds: Option<bool>,
}

impl StoredState {
    /// True when nothing was stored.
    pub fn is_empty(&self) -> bool {
        *self == StoredState::default()
    }

    /// Applies every present field over `base`.
    pub fn merge_over(self, base: ClockState) -> ClockState {
        ClockState {
            is_running: self.is_running.unwrap_or(base.is_running),
            seconds: self.seconds.unwrap_or(base.seconds),
            format: self.format.unwrap_or(base.format),
            display_formats: self.display_formats.unwrap_or(base.display_formats),
            speed: self.speed.unwrap_or(base.speed),
            display_speeds: self.display_speeds.unwrap_or(base.display_speeds),
        }
    }
}

impl From<ClockState> for StoredState {
    fn from(state: ClockState) -> Self {
        Self {
            is_running: Some(state.is_running),
            seconds: Some(state.seconds),
            format: Some(state.format),
            display_formats: Some(state.display_formats),
            speed: Some(state.speed),
            display_speeds: Some(state.display_speeds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ClockState::default();
        assert!(!state.is_running);
        assert_eq!(state.seconds, 0);
        assert_eq!(state.format, TimeFormat::Seconds);
        assert_eq!(state.speed, Speed::Normal);
        assert!(!state.display_formats);
        assert!(!state.display_speeds);
    }

    #[test]
    fn test_json_field_names() {
        let state = ClockState {
            is_running: true,
            seconds: 7,
            format: TimeFormat::Clock,
            display_formats: false,
            speed: Speed::Double,
            display_speeds: true,
        };
        let value = serde_json::to_value(state).unwrap();
        assert_eq!(value["isRunning"], true);
        assert_eq!(value["seconds"], 7);
        assert_eq!(value["format"], "clock");
        assert_eq!(value["displayFormats"], false);
        assert_eq!(value["speed"], "2x");
        assert_eq!(value["displaySpeeds"], true);
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let stored: StoredState = serde_json::from_str(r#"{"seconds":42,"speed":"4x"}"#).unwrap();
        let state = stored.merge_over(ClockState::default());
        assert_eq!(state.seconds, 42);
        assert_eq!(state.speed, Speed::Quadruple);
        assert_eq!(state.format, TimeFormat::Seconds);
        assert!(!state.is_running);
    }

    #[test]
    fn test_empty_record() {
        let stored: StoredState = serde_json::from_str("{}").unwrap();
        assert!(stored.is_empty());
        assert_eq!(stored.merge_over(ClockState::default()), ClockState::default());
    }

    #[test]
    fn test_full_record_round_trips_through_stored_state() {
        let state = ClockState {
            is_running: true,
            seconds: 99,
            format: TimeFormat::Nanoseconds,
            display_formats: true,
            speed: Speed::Half,
            display_speeds: false,
        };
        let stored = StoredState::from(state);
        assert_eq!(stored.merge_over(ClockState::default()), state);
    }
}
