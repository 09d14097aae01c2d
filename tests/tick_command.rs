use bubbletea_clock::prelude::*;
use bubbletea_rs::Msg;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_tick_command_delivers_tick_msg() {
    let store = MemoryStore::new("tick-command");
    let mut clock = Clock::new(Arc::new(store));
    clock.handle(ClockEvent::ClickSpeedOption(Speed::Tenfold));
    let source = clock
        .handle(ClockEvent::ClickStart)
        .expect("start schedules a tick");
    assert_eq!(source.interval(), Duration::from_millis(100));

    let msg: Msg = source.cmd().await.expect("tick command yields a message");
    let tick = msg
        .downcast_ref::<TickMsg>()
        .expect("message is a TickMsg")
        .clone();
    assert_eq!(tick, source.tick_msg());

    let next = clock.update(msg);
    assert!(next.is_some());
    assert_eq!(clock.seconds(), 1);
}

#[tokio::test]
async fn test_stale_command_is_not_rearmed() {
    let mut clock = Clock::new(Arc::new(MemoryStore::new("tick-command-stale")));
    clock.handle(ClockEvent::ClickSpeedOption(Speed::Tenfold));
    let source = clock
        .handle(ClockEvent::ClickStart)
        .expect("start schedules a tick");
    clock.handle(ClockEvent::ClickStop);

    let msg = source.cmd().await.expect("tick command yields a message");
    assert!(clock.update(msg).is_none());
    assert_eq!(clock.seconds(), 0);
}

#[tokio::test]
async fn test_init_resumes_running_clock() {
    let store = MemoryStore::new("tick-command-resume");
    store.set_raw(r#"{"isRunning":true,"seconds":41,"speed":"10x"}"#);

    let mut clock = Clock::new(Arc::new(store.clone()));
    let cmd = clock.init().expect("running clock schedules its first tick");
    let msg = cmd.await.expect("tick command yields a message");
    clock.update(msg);

    assert_eq!(clock.seconds(), 42);
    assert!(store.raw().unwrap_or_default().contains("\"seconds\":42"));
}
