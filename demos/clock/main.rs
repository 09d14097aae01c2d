//! Runs the clock in a terminal.
//!
//! State is kept in `$CLOCK_STATE_DIR/$CLOCK_LOCAL_STATE_KEY.json`, so
//! quitting and relaunching picks up where the clock left off. Set
//! `RUST_LOG=bubbletea_clock=debug` to log transitions to `clock.log` in the
//! same directory.

use bubbletea_clock::prelude::*;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss::{Color, Style};
use std::fs::{self, OpenOptions};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

static CONFIG: OnceLock<Config> = OnceLock::new();

struct App {
    clock: Clock,
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let config = CONFIG.get_or_init(Config::default);
        let clock = Clock::from_config(config);
        let cmd = clock.init();
        (App { clock }, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            let quitting = match key_msg.key {
                KeyCode::Char('q') => true,
                KeyCode::Char('c') => key_msg.modifiers.contains(KeyModifiers::CONTROL),
                _ => false,
            };
            if quitting {
                self.clock.unmount();
                return Some(quit());
            }
        }
        self.clock.update(msg)
    }

    fn view(&self) -> String {
        let title = Style::new()
            .bold(true)
            .foreground(Color::from("#7D56F4"))
            .render("Clock");
        let footer = Style::new()
            .foreground(Color::from("#626262"))
            .render("q: quit");
        format!("\n {}\n\n{}\n\n {}\n", title, self.clock.view(), footer)
    }
}

fn init_logging(config: &Config) {
    if fs::create_dir_all(&config.state_dir).is_err() {
        return;
    }
    let path = config.state_dir.join("clock.log");
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Loaded before logging exists, so the error is reported afterwards.
    let loaded = Config::load();
    let config = CONFIG.get_or_init(|| loaded.as_ref().cloned().unwrap_or_default());
    init_logging(config);
    if let Err(err) = &loaded {
        tracing::warn!(error = %err, "invalid clock configuration, using defaults");
    }

    let program = Program::<App>::builder().build()?;
    program.run().await?;
    Ok(())
}
