//! Key bindings for clock interactions.
//!
//! A [`Binding`] groups the key presses that trigger one action together
//! with the help text shown for it. Bindings can be disabled, which makes
//! them stop matching and disappear from help, so the help bar always
//! describes what the user can actually do right now.
//!
//! ```rust
//! use bubbletea_clock::key::{new_binding, with_help, with_keys_str};
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let mut start = new_binding(vec![with_keys_str(&["s"]), with_help("s", "start")]);
//! let press = KeyMsg { key: KeyCode::Char('s'), modifiers: KeyModifiers::NONE };
//! assert!(start.matches(&press));
//!
//! start.set_enabled(false);
//! assert!(!start.matches(&press));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key itself.
    pub code: KeyCode,
    /// Modifiers that must be held.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

impl KeyPress {
    /// Whether `msg` is this key press. Shift is ignored so that `G` and
    /// `?` match however the terminal reports them.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.code == msg.key
            && self.modifiers.difference(KeyModifiers::SHIFT)
                == msg.modifiers.difference(KeyModifiers::SHIFT)
    }
}

/// Help text for a binding: the key label and what it does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Key label, e.g. `"s"` or `"←/→"`.
    pub key: String,
    /// Action description, e.g. `"start"`.
    pub desc: String,
}

/// Keys that trigger one action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates an enabled binding for `keys` with no help text.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// The help text of this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding is active. Bindings without keys are never active.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether `msg` triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|press| press.matches(msg))
    }
}

/// Option for [`new_binding`].
pub enum BindingOpt {
    /// Adds key presses.
    Keys(Vec<KeyPress>),
    /// Sets the help text.
    Help(Help),
    /// Starts the binding disabled.
    Disabled,
}

/// Builds a binding from options.
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut binding = Binding::default();
    for opt in opts {
        match opt {
            BindingOpt::Keys(keys) => binding.keys.extend(keys),
            BindingOpt::Help(help) => binding.help = help,
            BindingOpt::Disabled => binding.disabled = true,
        }
    }
    binding
}

/// Keys given by name, e.g. `"ctrl+c"`, `"esc"`, `"left"` or `"q"`.
/// Names that do not parse are skipped.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    BindingOpt::Keys(keys.iter().filter_map(|k| parse_key(k)).collect())
}

/// Help text option.
pub fn with_help(key: &str, desc: &str) -> BindingOpt {
    BindingOpt::Help(Help {
        key: key.to_string(),
        desc: desc.to_string(),
    })
}

/// Disabled option.
pub fn with_disabled() -> BindingOpt {
    BindingOpt::Disabled
}

/// Parses a key name such as `"ctrl+c"` into a [`KeyPress`].
pub fn parse_key(name: &str) -> Option<KeyPress> {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = name;
    loop {
        if let Some(tail) = rest.strip_prefix("ctrl+") {
            modifiers |= KeyModifiers::CONTROL;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("alt+") {
            modifiers |= KeyModifiers::ALT;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("shift+") {
            modifiers |= KeyModifiers::SHIFT;
            rest = tail;
        } else {
            break;
        }
    }

    let code = match rest {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" | " " => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" => KeyCode::PageUp,
        "pgdown" => KeyCode::PageDown,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(KeyPress { code, modifiers })
}

/// Bindings a component exposes for help rendering.
pub trait KeyMap {
    /// Bindings for the one-line help bar.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped into columns for the expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_key("esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key("left").unwrap().code, KeyCode::Left);
        assert_eq!(parse_key("q").unwrap(), KeyPress::from(KeyCode::Char('q')));
        assert!(parse_key("nonsense").is_none());
    }

    #[test]
    fn test_parse_modifiers() {
        let ctrl_c = parse_key("ctrl+c").unwrap();
        assert_eq!(ctrl_c.code, KeyCode::Char('c'));
        assert_eq!(ctrl_c.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_matches_requires_same_modifiers() {
        let quit = new_binding(vec![with_keys_str(&["ctrl+c"])]);
        assert!(quit.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!quit.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_matches_ignores_shift() {
        let help = Binding::new(vec![KeyCode::Char('?')]);
        assert!(help.matches(&press(KeyCode::Char('?'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut binding = new_binding(vec![with_keys_str(&["s"]), with_disabled()]);
        assert!(!binding.enabled());
        assert!(!binding.matches(&press(KeyCode::Char('s'), KeyModifiers::NONE)));
        binding.set_enabled(true);
        assert!(binding.matches(&press(KeyCode::Char('s'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_binding_without_keys_is_disabled() {
        let binding = Binding::new(Vec::<KeyCode>::new()).with_help("x", "nothing");
        assert!(!binding.enabled());
        assert_eq!(binding.help().desc, "nothing");
    }
}
