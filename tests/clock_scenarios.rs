//! End-to-end clock behaviour under a virtual-time scheduler.
//!
//! `VirtualRuntime` stands in for the bubbletea-rs runtime: every tick source
//! the clock hands back is queued to fire after its interval, exactly like a
//! `tick` command would, and time only moves when a test advances it. Stale
//! ticks stay in the queue so the clock has to reject them itself.

use bubbletea_clock::prelude::*;
use std::sync::Arc;

struct VirtualRuntime {
    now_ms: u64,
    pending: Vec<(u64, TickMsg)>,
}

impl VirtualRuntime {
    fn new() -> Self {
        Self {
            now_ms: 0,
            pending: Vec::new(),
        }
    }

    fn schedule(&mut self, source: Option<TickSource>) {
        if let Some(source) = source {
            let due = self.now_ms + source.interval().as_millis() as u64;
            self.pending.push((due, source.tick_msg()));
        }
    }

    fn dispatch(&mut self, clock: &mut Clock, event: ClockEvent) {
        let source = clock.handle(event);
        self.schedule(source);
        self.assert_single_live_chain(clock);
    }

    fn advance(&mut self, clock: &mut Clock, ms: u64) {
        let target = self.now_ms + ms;
        loop {
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= target)
                .min_by_key(|(_, (due, _))| *due)
                .map(|(i, _)| i);
            let Some(i) = next else { break };
            let (due, msg) = self.pending.remove(i);
            self.now_ms = due;
            let source = clock.handle(ClockEvent::Tick(msg));
            self.schedule(source);
            self.assert_single_live_chain(clock);
        }
        self.now_ms = target;
    }

    fn assert_single_live_chain(&self, clock: &Clock) {
        let live = match clock.tick_source() {
            Some(source) => source.tick_msg(),
            None => {
                return;
            }
        };
        let chains = self.pending.iter().filter(|(_, msg)| *msg == live).count();
        assert!(chains <= 1, "{} live tick chains scheduled", chains);
    }
}

fn mount() -> (Clock, MemoryStore) {
    let store = MemoryStore::new("clock-scenarios");
    (Clock::new(Arc::new(store.clone())), store)
}

#[test]
fn test_start_then_stop_before_first_tick() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 999);
    rt.dispatch(&mut clock, ClockEvent::ClickStop);
    rt.advance(&mut clock, 10_000);

    assert_eq!(clock.seconds(), 0);
    assert!(!clock.is_running());
}

#[test]
fn test_one_tick_per_interval() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    for expected in 1..=5 {
        rt.advance(&mut clock, 1000);
        assert_eq!(clock.seconds(), expected);
    }
}

#[test]
fn test_slower_speed_replaces_source() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 1000);
    assert_eq!(clock.seconds(), 1);

    rt.dispatch(&mut clock, ClockEvent::ClickSpeedOption(Speed::Half));

    // The old one-second chain still has a tick queued; it must not count.
    rt.advance(&mut clock, 1000);
    assert_eq!(clock.seconds(), 1);

    rt.advance(&mut clock, 1000);
    assert_eq!(clock.seconds(), 2);

    rt.advance(&mut clock, 2000);
    assert_eq!(clock.seconds(), 3);
}

#[test]
fn test_faster_speed_does_not_double_tick() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 1000);
    rt.dispatch(&mut clock, ClockEvent::ClickSpeedOption(Speed::Double));

    rt.advance(&mut clock, 500);
    assert_eq!(clock.seconds(), 2);

    // Both the stale one-second tick and the new tick land at t=2000.
    rt.advance(&mut clock, 500);
    assert_eq!(clock.seconds(), 3);

    rt.advance(&mut clock, 2000);
    assert_eq!(clock.seconds(), 7);
}

#[test]
fn test_restart_discards_old_chain() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 500);
    rt.dispatch(&mut clock, ClockEvent::ClickStop);
    rt.dispatch(&mut clock, ClockEvent::ClickStart);

    // Old chain would fire at 1000, new one at 1500.
    rt.advance(&mut clock, 500);
    assert_eq!(clock.seconds(), 0);
    rt.advance(&mut clock, 500);
    assert_eq!(clock.seconds(), 1);
}

#[test]
fn test_reset_keeps_running() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 4000);
    rt.dispatch(&mut clock, ClockEvent::ClickReset);
    assert_eq!(clock.seconds(), 0);
    assert!(clock.is_running());

    rt.advance(&mut clock, 1000);
    assert_eq!(clock.seconds(), 1);
}

#[test]
fn test_walkthrough_popover() {
    let (mut clock, _) = mount();
    let mut rt = VirtualRuntime::new();
    assert_eq!(clock.state(), ClockState::default());

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 3000);
    assert_eq!(clock.seconds(), 3);
    assert_eq!(clock.display(), "3s");

    rt.dispatch(&mut clock, ClockEvent::ClickTimeDisplay);
    rt.dispatch(&mut clock, ClockEvent::ClickFormatOption(TimeFormat::Clock));
    assert_eq!(clock.display(), "00:00:03");

    rt.dispatch(&mut clock, ClockEvent::ClickReset);
    assert_eq!(clock.seconds(), 0);
    assert_eq!(clock.display(), "00:00:00");
    assert!(clock.is_running());
}

#[test]
fn test_walkthrough_simple() {
    let (clock, _) = mount();
    let mut clock = clock.with_variant(Variant::Simple);
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.advance(&mut clock, 3000);
    assert_eq!(clock.display(), "3s");

    rt.dispatch(&mut clock, ClockEvent::ClickTimeDisplay);
    assert_eq!(clock.display(), "3,000ms");
    rt.dispatch(&mut clock, ClockEvent::ClickTimeDisplay);
    assert_eq!(clock.display(), "3,000,000,000ns");
    rt.dispatch(&mut clock, ClockEvent::ClickTimeDisplay);
    assert_eq!(clock.display(), "00:00:03");
    rt.dispatch(&mut clock, ClockEvent::ClickTimeDisplay);
    assert_eq!(clock.display(), "3s");
}

#[test]
fn test_state_survives_remount() {
    let (mut clock, store) = mount();
    let mut rt = VirtualRuntime::new();

    rt.dispatch(&mut clock, ClockEvent::ClickStart);
    rt.dispatch(&mut clock, ClockEvent::ClickSpeedOption(Speed::Quadruple));
    rt.advance(&mut clock, 1000);
    rt.dispatch(&mut clock, ClockEvent::ClickTimeDisplay);
    rt.dispatch(&mut clock, ClockEvent::ClickFormatOption(TimeFormat::Milliseconds));
    assert_eq!(clock.seconds(), 4);
    clock.unmount();
    drop(clock);

    let mut remounted = Clock::new(Arc::new(store.clone()));
    assert_eq!(remounted.seconds(), 4);
    assert_eq!(remounted.format(), TimeFormat::Milliseconds);
    assert_eq!(remounted.speed(), Speed::Quadruple);
    assert!(remounted.is_running());

    // Ticks queued by the unmounted clock belong to another ticker.
    rt.advance(&mut remounted, 250);
    assert_eq!(remounted.seconds(), 4);

    let mut rt = VirtualRuntime::new();
    rt.schedule(remounted.tick_source().cloned());
    rt.advance(&mut remounted, 250);
    assert_eq!(remounted.seconds(), 5);
}

#[test]
fn test_store_round_trip_for_reachable_states() {
    let (mut clock, store) = mount();
    let mut rt = VirtualRuntime::new();
    let events = [
        ClockEvent::ClickStart,
        ClockEvent::ClickClockImage,
        ClockEvent::ClickSpeedOption(Speed::Tenfold),
        ClockEvent::ClickTimeDisplay,
        ClockEvent::ClickOutside,
        ClockEvent::ClickTimeDisplay,
        ClockEvent::ClickFormatOption(TimeFormat::Nanoseconds),
        ClockEvent::ClickStop,
        ClockEvent::ClickReset,
    ];
    for event in events {
        rt.dispatch(&mut clock, event);
        rt.advance(&mut clock, 300);
        assert_eq!(store.load(), StoredState::from(clock.state()));
    }
}
