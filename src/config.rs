//! Runtime configuration for the clock.
//!
//! Settings come from built-in defaults overridden by `CLOCK_`-prefixed
//! environment variables:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CLOCK_LOCAL_STATE_KEY` | `local_state_key` | `clock-state` |
//! | `CLOCK_STATE_DIR` | `state_dir` | `<config dir>/bubbletea-clock` |
//! | `CLOCK_VARIANT` | `variant` | `popover` |

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clock::Variant;

/// Where and how the clock persists itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Key the state record is stored under.
    pub local_state_key: String,
    /// Directory holding the state file.
    pub state_dir: PathBuf,
    /// Interaction model of the widget.
    pub variant: Variant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_state_key: "clock-state".to_string(),
            state_dir: default_state_dir(),
            variant: Variant::default(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("bubbletea-clock"))
        .unwrap_or_else(|| PathBuf::from(".bubbletea-clock"))
}

impl Config {
    /// Defaults merged with the `CLOCK_` environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("CLOCK_"))
    }

    /// Loads the configuration from [`Config::figment`].
    pub fn load() -> Result<Config, figment::Error> {
        Self::figment().extract()
    }

    /// Like [`Config::load`], but logs an invalid configuration and falls
    /// back to [`Config::default`].
    pub fn load_or_default() -> Config {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid clock configuration, using defaults");
            Config::default()
        })
    }
}
