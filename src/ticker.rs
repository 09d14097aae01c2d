//! The clock's periodic tick source.
//!
//! bubbletea-rs has no cancellable interval timer. A tick is a one-shot
//! [`bubbletea_rs::tick`] command that delivers a [`TickMsg`] after the
//! interval, and the receiver re-arms it by returning the next command.
//! Cancelling therefore means making sure in-flight messages are ignored
//! when they arrive.
//!
//! [`Ticker`] does that with two numbers carried on every message:
//!
//! - `id` identifies the ticker instance, so several clocks can share one
//!   program without eating each other's ticks.
//! - `tag` is a generation counter bumped on every restart. Only the
//!   generation held by the live [`TickSource`] is accepted. A message from
//!   a cancelled generation is dropped and, because it is not re-armed,
//!   its chain ends there.
//!
//! The result is that at most one chain of ticks is ever live per ticker.
//!
//! ```rust
//! use bubbletea_clock::ticker::Ticker;
//! use std::time::Duration;
//!
//! let mut ticker = Ticker::new();
//! let first = ticker.restart(Duration::from_secs(1));
//! let stale = first.tick_msg();
//!
//! let second = ticker.restart(Duration::from_millis(500));
//! assert!(ticker.accept(&stale).is_none());
//! assert_eq!(ticker.accept(&second.tick_msg()), Some(second));
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for ticker instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Message delivered when a tick interval elapses.
///
/// Only the [`Ticker`] that produced it, and only while the same generation
/// is live, will accept it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMsg {
    /// The ticker instance this tick belongs to.
    pub id: i64,
    /// Generation of the source that scheduled this tick.
    tag: i64,
}

impl TickMsg {
    /// Generation of the source that scheduled this tick.
    pub fn tag(&self) -> i64 {
        self.tag
    }
}

/// Handle to one generation of ticks.
///
/// A source is a description of "deliver a [`TickMsg`] every `interval`".
/// It becomes a running timer only when its [`cmd`](TickSource::cmd) is
/// handed to the bubbletea-rs runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSource {
    id: i64,
    tag: i64,
    interval: Duration,
}

impl TickSource {
    /// The owning ticker's id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The generation this source belongs to.
    pub fn tag(&self) -> i64 {
        self.tag
    }

    /// Time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The message this source delivers when its interval elapses.
    pub fn tick_msg(&self) -> TickMsg {
        TickMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Command that sleeps for one interval and then delivers a [`TickMsg`].
    pub fn cmd(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }
}

/// Owner of at most one live [`TickSource`].
#[derive(Debug)]
pub struct Ticker {
    id: i64,
    tag: i64,
    live: Option<TickSource>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker {
    /// Creates an idle ticker with a fresh unique id.
    pub fn new() -> Self {
        Self {
            id: next_id(),
            tag: 0,
            live: None,
        }
    }

    /// Unique id of this ticker.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the live source, if any.
    pub fn live(&self) -> Option<&TickSource> {
        self.live.as_ref()
    }

    /// Whether a source is currently live.
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Cancels the live source and starts a new generation at `interval`.
    ///
    /// The previous generation is invalidated before the new one exists, so
    /// its in-flight ticks are rejected from now on.
    pub fn restart(&mut self, interval: Duration) -> TickSource {
        if let Some(old) = self.cancel() {
            tracing::debug!(id = self.id, tag = old.tag, "replacing tick source");
        }
        self.tag += 1;
        let source = TickSource {
            id: self.id,
            tag: self.tag,
            interval,
        };
        tracing::debug!(id = self.id, tag = self.tag, ?interval, "tick source started");
        self.live = Some(source.clone());
        source
    }

    /// Cancels the live source, returning it if there was one.
    pub fn cancel(&mut self) -> Option<TickSource> {
        self.live.take()
    }

    /// Checks `msg` against the live source.
    ///
    /// Returns the source to re-arm when the tick belongs to the live
    /// generation, and `None` when it is foreign or stale.
    pub fn accept(&self, msg: &TickMsg) -> Option<TickSource> {
        match &self.live {
            Some(source) if msg.id == source.id && msg.tag == source.tag => Some(source.clone()),
            _ => {
                tracing::trace!(id = msg.id, tag = msg.tag, "dropping stale tick");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        let a = Ticker::new();
        let b = Ticker::new();
        assert_ne!(a.id(), b.id());
        assert!(a.id() > 0);
    }

    #[test]
    fn test_new_ticker_is_idle() {
        let ticker = Ticker::new();
        assert!(!ticker.is_live());
        assert!(ticker.live().is_none());
    }

    #[test]
    fn test_restart_bumps_generation() {
        let mut ticker = Ticker::new();
        let a = ticker.restart(Duration::from_secs(1));
        let b = ticker.restart(Duration::from_secs(1));
        assert!(b.tag() > a.tag());
        assert_eq!(ticker.live(), Some(&b));
    }

    #[test]
    fn test_accept_live_tick() {
        let mut ticker = Ticker::new();
        let source = ticker.restart(Duration::from_millis(250));
        let rearm = ticker.accept(&source.tick_msg());
        assert_eq!(rearm, Some(source));
    }

    #[test]
    fn test_rejects_stale_generation() {
        let mut ticker = Ticker::new();
        let old = ticker.restart(Duration::from_secs(1));
        ticker.restart(Duration::from_millis(500));
        assert!(ticker.accept(&old.tick_msg()).is_none());
    }

    #[test]
    fn test_rejects_after_cancel() {
        let mut ticker = Ticker::new();
        let source = ticker.restart(Duration::from_secs(1));
        assert_eq!(ticker.cancel(), Some(source.clone()));
        assert!(ticker.accept(&source.tick_msg()).is_none());
        assert!(ticker.cancel().is_none());
    }

    #[test]
    fn test_rejects_foreign_ticker() {
        let mut mine = Ticker::new();
        let mut other = Ticker::new();
        mine.restart(Duration::from_secs(1));
        let foreign = other.restart(Duration::from_secs(1));
        assert!(mine.accept(&foreign.tick_msg()).is_none());
    }

    #[test]
    fn test_source_cmd_is_constructible() {
        let mut ticker = Ticker::new();
        let source = ticker.restart(Duration::from_millis(100));
        let _cmd = source.cmd();
        assert_eq!(source.interval(), Duration::from_millis(100));
    }
}
