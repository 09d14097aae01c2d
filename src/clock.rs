//! The clock widget.
//!
//! [`Model`] owns a [`ClockState`], a [`Ticker`] and a [`StateStore`]. Every
//! interaction is an [`Event`] and goes through [`Model::handle`], the one
//! place state changes. After each transition the full state is written to
//! the store.
//!
//! # Variants
//!
//! The widget comes in two interaction models that share one state machine:
//!
//! - [`Variant::Popover`] (default): selecting the time display opens a
//!   format picker; selecting the clock face opens a speed picker.
//! - [`Variant::Simple`]: selecting the time display switches straight to
//!   the next format, and hovering shows a tip naming that next format.
//!   There is no speed selector, so the clock keeps the speed it was
//!   mounted with. Both variants show the phase line with that speed.
//!
//! # Ticking
//!
//! Starting the clock, or changing speed while it runs, replaces the live
//! [`TickSource`]. The old generation is invalidated first, so ticks that
//! were already scheduled for it are ignored on arrival and only one tick
//! chain is ever live.
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use bubbletea_clock::clock::Model as Clock;
//! use bubbletea_clock::store::MemoryStore;
//! use std::sync::Arc;
//!
//! struct App {
//!     clock: Clock,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let clock = Clock::new(Arc::new(MemoryStore::new("clock-state")));
//!         let cmd = clock.init();
//!         (Self { clock }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.clock.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.clock.view()
//!     }
//! }
//! ```

use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::format::TimeFormat;
use crate::help;
use crate::key::{self, KeyMap};
use crate::speed::Speed;
use crate::state::ClockState;
use crate::store::{FileStore, StateStore};
use crate::ticker::{TickMsg, TickSource, Ticker};

/// Interaction model of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Click-to-cycle formats with a hover tip. The speed cannot be changed;
    /// the clock ticks at whatever speed it was mounted with.
    Simple,
    /// Format and speed pickers.
    #[default]
    Popover,
}

/// Everything that can happen to the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start button. Ignored while running.
    ClickStart,
    /// Stop button. Ignored while stopped.
    ClickStop,
    /// Reset button.
    ClickReset,
    /// A tick interval elapsed.
    Tick(TickMsg),
    /// The time display was selected.
    ClickTimeDisplay,
    /// A format was chosen in the format picker.
    ClickFormatOption(TimeFormat),
    /// Pointer entered the time display.
    HoverTimeEnter,
    /// Pointer left the time display.
    HoverTimeLeave,
    /// The clock face was selected.
    ClickClockImage,
    /// A speed was chosen in the speed picker.
    ClickSpeedOption(Speed),
    /// Somewhere outside an open picker was selected.
    ClickOutside,
}

/// Visual state of the clock face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing counted yet.
    Idle,
    /// Counting.
    Playing,
    /// Stopped with time on the display.
    Paused,
}

impl Phase {
    /// Lowercase name of the phase.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Phase::Idle => "○",
            Phase::Playing => "▶",
            Phase::Paused => "⏸",
        }
    }
}

/// Key bindings of the clock.
#[derive(Debug, Clone)]
pub struct ClockKeyMap {
    /// Start button.
    pub start: key::Binding,
    /// Stop button.
    pub stop: key::Binding,
    /// Reset button.
    pub reset: key::Binding,
    /// Select the time display.
    pub time: key::Binding,
    /// Select the clock face.
    pub face: key::Binding,
    /// Toggle hovering over the time display.
    pub hover: key::Binding,
    /// Move the picker highlight back.
    pub prev: key::Binding,
    /// Move the picker highlight forward.
    pub next: key::Binding,
    /// Choose the highlighted picker option.
    pub choose: key::Binding,
    /// Close open pickers.
    pub dismiss: key::Binding,
    /// Toggle the expanded help.
    pub help: key::Binding,
}

impl Default for ClockKeyMap {
    fn default() -> Self {
        Self {
            start: key::new_binding(vec![key::with_keys_str(&["s"]), key::with_help("s", "start")]),
            stop: key::new_binding(vec![key::with_keys_str(&["x"]), key::with_help("x", "stop")]),
            reset: key::new_binding(vec![key::with_keys_str(&["r"]), key::with_help("r", "reset")]),
            time: key::new_binding(vec![
                key::with_keys_str(&["f", "enter"]),
                key::with_help("f", "format"),
            ]),
            face: key::new_binding(vec![key::with_keys_str(&["c"]), key::with_help("c", "speed")]),
            hover: key::new_binding(vec![key::with_keys_str(&["h"]), key::with_help("h", "hint")]),
            prev: key::Binding::new(vec![KeyCode::Left, KeyCode::Up, KeyCode::Char('k')])
                .with_help("←/k", "prev"),
            next: key::Binding::new(vec![KeyCode::Right, KeyCode::Down, KeyCode::Char('j')])
                .with_help("→/j", "next"),
            choose: key::new_binding(vec![
                key::with_keys_str(&["enter", "space"]),
                key::with_help("enter", "choose"),
            ]),
            dismiss: key::new_binding(vec![key::with_keys_str(&["esc"]), key::with_help("esc", "close")]),
            help: key::new_binding(vec![key::with_keys_str(&["?"]), key::with_help("?", "more")]),
        }
    }
}

impl KeyMap for ClockKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.start,
            &self.stop,
            &self.reset,
            &self.time,
            &self.face,
            &self.hover,
            &self.choose,
            &self.dismiss,
            &self.help,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.start, &self.stop, &self.reset],
            vec![&self.time, &self.face, &self.hover],
            vec![&self.prev, &self.next, &self.choose, &self.dismiss],
            vec![&self.help],
        ]
    }
}

/// Styles for the clock view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Phase line above the time.
    pub face: Style,
    /// The time display.
    pub time: Style,
    /// The next-format tip.
    pub tip: Style,
    /// Picker title.
    pub picker_title: Style,
    /// Unhighlighted picker option.
    pub option: Style,
    /// Highlighted picker option.
    pub highlighted: Style,
    /// Enabled button.
    pub button: Style,
    /// Disabled button.
    pub disabled_button: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            face: Style::new().foreground(lipgloss::Color::from("#61DAFB")),
            time: Style::new().bold(true),
            tip: Style::new().italic(true).foreground(lipgloss::Color::from("#777777")),
            picker_title: Style::new().underline(true),
            option: Style::new().padding_left(2),
            highlighted: Style::new().padding_left(2).reverse(true),
            button: Style::new().bold(true),
            disabled_button: Style::new().faint(true),
        }
    }
}

/// The clock widget.
#[derive(Debug)]
pub struct Model {
    state: ClockState,
    variant: Variant,
    show_format_tip: bool,
    format_cursor: usize,
    speed_cursor: usize,
    ticker: Ticker,
    store: Arc<dyn StateStore>,
    /// Key bindings. Their enabled flags follow the clock state.
    pub keymap: ClockKeyMap,
    /// Help bar.
    pub help: help::Model,
    /// Visual styles.
    pub styles: Styles,
}

impl Model {
    /// Mounts a popover clock seeded from `store`.
    ///
    /// Stored fields override the defaults. Pickers always start closed. If
    /// the stored clock was running, a tick source is started right away and
    /// [`Model::init`] returns its command.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        let stored = store.load();
        let mut state = stored.merge_over(ClockState::default());
        state.display_formats = false;
        state.display_speeds = false;

        let mut model = Self {
            state,
            variant: Variant::default(),
            show_format_tip: false,
            format_cursor: state.format.index(),
            speed_cursor: state.speed.index(),
            ticker: Ticker::new(),
            store,
            keymap: ClockKeyMap::default(),
            help: help::Model::new(),
            styles: Styles::default(),
        };
        if model.state.is_running {
            model.ticker.restart(model.state.speed.interval());
        }
        model.sync_keymap();
        tracing::debug!(state = ?model.state, resumed = !stored.is_empty(), "clock mounted");
        model
    }

    /// Mounts a clock as configured, persisting to a [`FileStore`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(FileStore::from_config(config))).with_variant(config.variant)
    }

    /// Switches the interaction model.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        if variant == Variant::Simple {
            self.state.display_formats = false;
            self.state.display_speeds = false;
        }
        self.sync_keymap();
        self
    }

    /// Command for the first tick when the clock was mounted running.
    pub fn init(&self) -> Option<Cmd> {
        self.ticker.live().map(TickSource::cmd)
    }

    /// Cancels the live tick source. Ticks still in flight are ignored.
    /// Returns whether a source was live.
    pub fn unmount(&mut self) -> bool {
        self.ticker.cancel().is_some()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Accumulated ticks.
    pub fn seconds(&self) -> u64 {
        self.state.seconds
    }

    /// Whether the clock is counting.
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Current display format.
    pub fn format(&self) -> TimeFormat {
        self.state.format
    }

    /// Current tick rate.
    pub fn speed(&self) -> Speed {
        self.state.speed
    }

    /// Interaction model.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether the format picker is open.
    pub fn format_picker_open(&self) -> bool {
        self.state.display_formats
    }

    /// Whether the speed picker is open.
    pub fn speed_picker_open(&self) -> bool {
        self.state.display_speeds
    }

    /// Whether the next-format tip is shown.
    pub fn format_tip_visible(&self) -> bool {
        self.show_format_tip
    }

    /// The live tick source, if any.
    pub fn tick_source(&self) -> Option<&TickSource> {
        self.ticker.live()
    }

    /// Clock face state.
    pub fn phase(&self) -> Phase {
        if self.state.seconds == 0 {
            Phase::Idle
        } else if self.state.is_running {
            Phase::Playing
        } else {
            Phase::Paused
        }
    }

    /// The time display text.
    pub fn display(&self) -> String {
        self.state.format.render(self.state.seconds)
    }

    /// Applies one event.
    ///
    /// Returns the tick source to schedule when the event started, replaced
    /// or re-armed one. Events that do not apply in the current state are
    /// ignored and nothing is saved.
    pub fn handle(&mut self, event: Event) -> Option<TickSource> {
        match &event {
            Event::Tick(_) => tracing::trace!(?event, "clock event"),
            _ => tracing::debug!(?event, "clock event"),
        }

        let schedule = match event {
            Event::ClickStart => {
                if self.state.is_running {
                    return None;
                }
                self.state.is_running = true;
                Some(self.ticker.restart(self.state.speed.interval()))
            }
            Event::ClickStop => {
                if !self.state.is_running {
                    return None;
                }
                self.state.is_running = false;
                self.ticker.cancel();
                None
            }
            Event::ClickReset => {
                self.state.seconds = 0;
                None
            }
            Event::Tick(msg) => {
                let rearm = self.ticker.accept(&msg)?;
                self.state.seconds = self.state.seconds.saturating_add(1);
                Some(rearm)
            }
            Event::ClickTimeDisplay => {
                match self.variant {
                    Variant::Simple => self.state.format = self.state.format.next(),
                    Variant::Popover if self.any_picker_open() => self.close_pickers(),
                    Variant::Popover => {
                        self.state.display_formats = true;
                        self.format_cursor = self.state.format.index();
                    }
                }
                None
            }
            Event::ClickFormatOption(format) => {
                self.state.format = format;
                self.close_pickers();
                None
            }
            Event::HoverTimeEnter | Event::HoverTimeLeave if self.variant != Variant::Simple => {
                return None;
            }
            Event::HoverTimeEnter => {
                self.show_format_tip = true;
                None
            }
            Event::HoverTimeLeave => {
                self.show_format_tip = false;
                None
            }
            Event::ClickClockImage => {
                if self.variant != Variant::Popover {
                    return None;
                }
                if self.state.display_speeds {
                    self.close_pickers();
                } else {
                    self.state.display_formats = false;
                    self.state.display_speeds = true;
                    self.speed_cursor = self.state.speed.index();
                }
                None
            }
            Event::ClickSpeedOption(_) if self.variant != Variant::Popover => {
                return None;
            }
            Event::ClickSpeedOption(speed) => {
                let mut schedule = None;
                if speed != self.state.speed {
                    self.state.speed = speed;
                    if self.state.is_running {
                        schedule = Some(self.ticker.restart(speed.interval()));
                    }
                }
                self.close_pickers();
                schedule
            }
            Event::ClickOutside => {
                if !self.any_picker_open() {
                    return None;
                }
                self.close_pickers();
                None
            }
        };

        self.sync_keymap();
        self.store.save(&self.state);
        schedule
    }

    /// Processes a bubbletea-rs message.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            return self.handle(Event::Tick(tick.clone())).map(|s| s.cmd());
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.on_key(key_msg).map(|s| s.cmd());
        }

        None
    }

    fn on_key(&mut self, key_msg: &KeyMsg) -> Option<TickSource> {
        if self.keymap.help.matches(key_msg) {
            self.help.show_all = !self.help.show_all;
            return None;
        }

        if self.any_picker_open() {
            if self.keymap.prev.matches(key_msg) {
                self.move_cursor(false);
                return None;
            }
            if self.keymap.next.matches(key_msg) {
                self.move_cursor(true);
                return None;
            }
            if self.keymap.choose.matches(key_msg) {
                let event = if self.state.display_formats {
                    Event::ClickFormatOption(TimeFormat::ALL[self.format_cursor])
                } else {
                    Event::ClickSpeedOption(Speed::ALL[self.speed_cursor])
                };
                return self.handle(event);
            }
        }

        let km = &self.keymap;
        let event = if km.start.matches(key_msg) {
            Event::ClickStart
        } else if km.stop.matches(key_msg) {
            Event::ClickStop
        } else if km.reset.matches(key_msg) {
            Event::ClickReset
        } else if km.time.matches(key_msg) {
            Event::ClickTimeDisplay
        } else if km.face.matches(key_msg) {
            Event::ClickClockImage
        } else if km.hover.matches(key_msg) {
            if self.show_format_tip {
                Event::HoverTimeLeave
            } else {
                Event::HoverTimeEnter
            }
        } else if km.dismiss.matches(key_msg) {
            Event::ClickOutside
        } else {
            return None;
        };
        self.handle(event)
    }

    fn any_picker_open(&self) -> bool {
        self.state.display_formats || self.state.display_speeds
    }

    fn close_pickers(&mut self) {
        self.state.display_formats = false;
        self.state.display_speeds = false;
    }

    fn move_cursor(&mut self, forward: bool) {
        let (cursor, len) = if self.state.display_formats {
            (&mut self.format_cursor, TimeFormat::ALL.len())
        } else {
            (&mut self.speed_cursor, Speed::ALL.len())
        };
        *cursor = if forward {
            (*cursor + 1) % len
        } else {
            (*cursor + len - 1) % len
        };
    }

    fn sync_keymap(&mut self) {
        let picker_open = self.any_picker_open();
        let running = self.state.is_running;
        let km = &mut self.keymap;
        km.start.set_enabled(!running);
        km.stop.set_enabled(running);
        km.face.set_enabled(self.variant == Variant::Popover);
        km.hover.set_enabled(self.variant == Variant::Simple);
        km.prev.set_enabled(picker_open);
        km.next.set_enabled(picker_open);
        km.choose.set_enabled(picker_open);
        km.dismiss.set_enabled(picker_open);
    }

    /// Renders the clock.
    pub fn view(&self) -> String {
        let mut lines = Vec::new();

        let phase = self.phase();
        lines.push(self.styles.face.render(&format!(
            "{} {} · {}",
            phase.glyph(),
            phase.label(),
            self.state.speed
        )));

        if self.state.display_speeds {
            lines.push(self.speed_picker_view());
        }
        if self.state.display_formats {
            lines.push(self.format_picker_view());
        }
        if self.show_format_tip {
            let next = self.state.format.next();
            lines.push(self.styles.tip.render(&format!(
                "Change to {} ({})",
                next,
                next.render(self.state.seconds)
            )));
        }

        lines.push(self.styles.time.render(&self.display()));
        lines.push(self.buttons_view());

        let help = self.help.view(&self.keymap);
        if !help.is_empty() {
            lines.push(String::new());
            lines.push(help);
        }
        lines.join("\n")
    }

    fn format_picker_view(&self) -> String {
        let mut rows = vec![self.styles.picker_title.render("Formats")];
        for (i, format) in TimeFormat::ALL.iter().enumerate() {
            let marker = if *format == self.state.format { "•" } else { " " };
            let text = format!(
                "{} {:<12} {}",
                marker,
                format.label(),
                format.render(self.state.seconds)
            );
            let style = if i == self.format_cursor {
                &self.styles.highlighted
            } else {
                &self.styles.option
            };
            rows.push(style.render(&text));
        }
        rows.join("\n")
    }

    fn speed_picker_view(&self) -> String {
        let options: Vec<String> = Speed::ALL
            .iter()
            .enumerate()
            .map(|(i, speed)| {
                let text = if *speed == self.state.speed {
                    format!("[{}]", speed)
                } else {
                    format!(" {} ", speed)
                };
                if i == self.speed_cursor {
                    self.styles.highlighted.render(&text)
                } else {
                    self.styles.option.render(&text)
                }
            })
            .collect();
        format!(
            "{}\n{}",
            self.styles.picker_title.render("Speed"),
            options.join("")
        )
    }

    fn buttons_view(&self) -> String {
        let button = |label: &str, enabled: bool| {
            let text = format!("[ {} ]", label);
            if enabled {
                self.styles.button.render(&text)
            } else {
                self.styles.disabled_button.render(&text)
            }
        };
        [
            button("Start", !self.state.is_running),
            button("Stop", self.state.is_running),
            button("Reset", true),
        ]
        .join(" ")
    }
}

impl bubbletea_rs::Model for Model {
    /// Standalone clock persisting under the configured key. Falls back to
    /// the default configuration when the environment cannot be read.
    fn init() -> (Self, Option<Cmd>) {
        let model = Model::from_config(&Config::load_or_default());
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
