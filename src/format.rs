//! Display formats for elapsed time.
//!
//! The clock counts whole ticks, and this module turns that count into the
//! text shown on the time display. Four formats are available and they are
//! visited in a fixed cyclic order:
//!
//! | Format | Example for 3723 ticks |
//! |--------|------------------------|
//! | `Seconds` | `3723s` |
//! | `Milliseconds` | `3,723,000ms` |
//! | `Nanoseconds` | `3,723,000,000,000ns` |
//! | `Clock` | `01:02:03` |
//!
//! ```rust
//! use bubbletea_clock::format::{format_elapsed, TimeFormat};
//!
//! assert_eq!(format_elapsed(3, TimeFormat::Seconds), "3s");
//! assert_eq!(format_elapsed(3, TimeFormat::Milliseconds), "3,000ms");
//! assert_eq!(TimeFormat::Clock.next(), TimeFormat::Seconds);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseSelectorError;

/// The textual representation used for elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// Plain seconds, e.g. `42s`.
    #[default]
    Seconds,
    /// Milliseconds with thousands separators, e.g. `42,000ms`.
    Milliseconds,
    /// Nanoseconds with thousands separators.
    Nanoseconds,
    /// Wall-clock style `HH:MM:SS`.
    Clock,
}

impl TimeFormat {
    /// Every format, in cycle order.
    pub const ALL: [TimeFormat; 4] = [
        TimeFormat::Seconds,
        TimeFormat::Milliseconds,
        TimeFormat::Nanoseconds,
        TimeFormat::Clock,
    ];

    /// Returns the format that follows this one, wrapping from `Clock` back
    /// to `Seconds`.
    pub fn next(self) -> TimeFormat {
        match self {
            TimeFormat::Seconds => TimeFormat::Milliseconds,
            TimeFormat::Milliseconds => TimeFormat::Nanoseconds,
            TimeFormat::Nanoseconds => TimeFormat::Clock,
            TimeFormat::Clock => TimeFormat::Seconds,
        }
    }

    /// Position of this format within [`TimeFormat::ALL`].
    pub fn index(self) -> usize {
        match self {
            TimeFormat::Seconds => 0,
            TimeFormat::Milliseconds => 1,
            TimeFormat::Nanoseconds => 2,
            TimeFormat::Clock => 3,
        }
    }

    /// The persisted and displayed name of the format.
    pub fn label(self) -> &'static str {
        match self {
            TimeFormat::Seconds => "seconds",
            TimeFormat::Milliseconds => "milliseconds",
            TimeFormat::Nanoseconds => "nanoseconds",
            TimeFormat::Clock => "clock",
        }
    }

    /// Renders `seconds` in this format. Shorthand for [`format_elapsed`].
    pub fn render(self, seconds: u64) -> String {
        format_elapsed(seconds, self)
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeFormat {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFormat::ALL
            .into_iter()
            .find(|format| format.label() == s)
            .ok_or_else(|| ParseSelectorError::Format(s.to_string()))
    }
}

/// Converts an elapsed tick count into display text for `format`.
///
/// Nanoseconds are computed in `u128` so the largest `u64` input still
/// renders exactly. Clock hours are not capped at two digits.
pub fn format_elapsed(seconds: u64, format: TimeFormat) -> String {
    match format {
        TimeFormat::Seconds => format!("{}s", seconds),
        TimeFormat::Milliseconds => {
            format!("{}ms", group_thousands(u128::from(seconds) * 1_000))
        }
        TimeFormat::Nanoseconds => {
            format!("{}ns", group_thousands(u128::from(seconds) * 1_000_000_000))
        }
        TimeFormat::Clock => format_hms(seconds),
    }
}

/// Formats seconds as `HH:MM:SS` with cumulative hours.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds - hours * 3600) / 60;
    let secs = seconds - hours * 3600 - minutes * 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Inserts `,` between every group of three digits, counting from the right.
pub fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
