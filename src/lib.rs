#![warn(missing_docs)]

//! # bubbletea-clock
//!
//! A clock/stopwatch widget for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: a ticking counter with start, stop and reset buttons, a time
//! display that switches between seconds, milliseconds, nanoseconds and
//! `HH:MM:SS`, and a speed selector that changes the tick rate. The widget's
//! state survives restarts through a small JSON store.
//!
//! ## Overview
//!
//! The widget follows the Elm Architecture like the rest of the bubbletea-rs
//! ecosystem: `init()` returns the first command, `update()` consumes messages
//! and `view()` renders a string. Underneath, every interaction is a
//! [`clock::Event`] applied by [`clock::Model::handle`], so the state machine
//! can be driven and tested without a terminal.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`format`] | Elapsed-time formatting and the format cycle |
//! | [`speed`] | Speed selectors and their tick intervals |
//! | [`ticker`] | The single live tick source |
//! | [`state`] | The persisted state record |
//! | [`store`] | File and in-memory persistence |
//! | [`config`] | Storage key, directory and variant from the environment |
//! | [`key`] / [`help`] | Key bindings and the help bar |
//! | [`clock`] | The widget itself |
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_clock::prelude::*;
//! use std::sync::Arc;
//!
//! let mut clock = Clock::new(Arc::new(MemoryStore::new("clock-state")));
//! let source = clock.handle(ClockEvent::ClickStart).expect("starting schedules a tick");
//!
//! // The runtime would deliver this after `source.interval()`.
//! clock.handle(ClockEvent::Tick(source.tick_msg()));
//! assert_eq!(clock.display(), "1s");
//!
//! clock.handle(ClockEvent::ClickTimeDisplay);
//! clock.handle(ClockEvent::ClickFormatOption(TimeFormat::Clock));
//! assert_eq!(clock.display(), "00:00:01");
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (transitions at `debug`, dropped ticks
//! at `trace`, storage problems at `warn`) and never installs a subscriber.

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod help;
pub mod key;
pub mod speed;
pub mod state;
pub mod store;
pub mod ticker;

pub use clock::{ClockKeyMap, Event as ClockEvent, Model as Clock, Phase, Variant};
pub use config::Config;
pub use error::{ParseSelectorError, StoreError};
pub use format::{format_elapsed, TimeFormat};
pub use help::Model as HelpModel;
pub use key::{new_binding, with_disabled, with_help, with_keys_str, Binding, KeyMap, KeyPress};
pub use speed::Speed;
pub use state::{ClockState, StoredState};
pub use store::{FileStore, MemoryStore, StateStore};
pub use ticker::{TickMsg, TickSource, Ticker};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_clock::prelude::*;
///
/// assert_eq!(format_elapsed(90, TimeFormat::Clock), "00:01:30");
/// assert_eq!(Speed::Double.interval().as_millis(), 500);
/// ```
pub mod prelude {
    pub use crate::clock::{ClockKeyMap, Event as ClockEvent, Model as Clock, Phase, Variant};
    pub use crate::config::Config;
    pub use crate::format::{format_elapsed, TimeFormat};
    pub use crate::help::Model as HelpModel;
    pub use crate::key::{Binding, KeyMap};
    pub use crate::speed::Speed;
    pub use crate::state::{ClockState, StoredState};
    pub use crate::store::{FileStore, MemoryStore, StateStore};
    pub use crate::ticker::{TickMsg, TickSource};
}
