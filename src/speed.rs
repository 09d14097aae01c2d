//! Tick-rate selection for the clock.
//!
//! A [`Speed`] is a multiplier over the one-second baseline. The clock still
//! adds exactly one unit per tick; a faster speed simply shortens the time
//! between ticks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ParseSelectorError;

/// Multiplier controlling how often the clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Speed {
    /// Half speed, one tick every two seconds.
    #[serde(rename = "0.5x")]
    Half,
    /// Real time, one tick per second.
    #[default]
    #[serde(rename = "1x")]
    Normal,
    /// Two ticks per second.
    #[serde(rename = "2x")]
    Double,
    /// Four ticks per second.
    #[serde(rename = "4x")]
    Quadruple,
    /// Ten ticks per second.
    #[serde(rename = "10x")]
    Tenfold,
}

impl Speed {
    /// Every speed, slowest first. This is the order the speed picker uses.
    pub const ALL: [Speed; 5] = [
        Speed::Half,
        Speed::Normal,
        Speed::Double,
        Speed::Quadruple,
        Speed::Tenfold,
    ];

    /// Returns the tick period for this speed.
    ///
    /// ```rust
    /// use bubbletea_clock::speed::Speed;
    /// use std::time::Duration;
    ///
    /// assert_eq!(Speed::Normal.interval(), Duration::from_millis(1000));
    /// assert_eq!(Speed::Double.interval(), Duration::from_millis(500));
    /// ```
    pub fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms())
    }

    /// The tick period in whole milliseconds.
    pub fn interval_ms(self) -> u64 {
        match self {
            Speed::Half => 2000,
            Speed::Normal => 1000,
            Speed::Double => 500,
            Speed::Quadruple => 250,
            Speed::Tenfold => 100,
        }
    }

    /// Position of this speed within [`Speed::ALL`].
    pub fn index(self) -> usize {
        match self {
            Speed::Half => 0,
            Speed::Normal => 1,
            Speed::Double => 2,
            Speed::Quadruple => 3,
            Speed::Tenfold => 4,
        }
    }

    /// The persisted and displayed name, e.g. `"2x"`.
    pub fn label(self) -> &'static str {
        match self {
            Speed::Half => "0.5x",
            Speed::Normal => "1x",
            Speed::Double => "2x",
            Speed::Quadruple => "4x",
            Speed::Tenfold => "10x",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Speed {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::ALL
            .into_iter()
            .find(|speed| speed.label() == s)
            .ok_or_else(|| ParseSelectorError::Speed(s.to_string()))
    }
}
