use std::sync::atomic::{AtomicUsize, Ordering};

use shared::domain::TaskStatus;

use super::*;
use crate::{
    clock::ManualClock,
    store::{ClientEvent, SyncClient},
    test_support::FakeBackend,
};

const INTERVAL: Duration = DEFAULT_POLL_INTERVAL;

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn refresh_returns_both_collections() {
    let backend = FakeBackend::new();
    backend.seed_task("t1", "Leave request", TaskStatus::Pending).await;
    backend.seed_interview("i1", None).await;
    let poller = Poller::new(Arc::new(backend));

    let snapshot = poller.refresh().await.expect("refresh");
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.interviews.len(), 1);
}

#[tokio::test]
async fn refresh_fails_when_either_read_fails() {
    let backend = FakeBackend::new();
    let poller = Poller::new(Arc::new(backend.clone()));

    backend.fail_interview_reads(1).await;
    let err = poller.refresh().await.expect_err("interviews down");
    assert!(format!("{err:#}").contains("failed to fetch interviews"));

    backend.fail_task_reads(1).await;
    let err = poller.refresh().await.expect_err("tasks down");
    assert!(format!("{err:#}").contains("failed to fetch tasks"));

    assert!(poller.refresh().await.is_ok());
}

#[tokio::test]
async fn first_tick_runs_on_mount() {
    let backend = FakeBackend::new();
    backend.seed_task("t1", "Leave request", TaskStatus::Pending).await;
    let client = SyncClient::new(Arc::new(backend.clone()));
    let mut events = client.subscribe_events();
    let clock = Arc::new(ManualClock::new());

    let handle = client.start_polling(clock.clone(), INTERVAL);

    assert_eq!(
        events.recv().await.expect("event"),
        ClientEvent::SnapshotApplied {
            tasks: 1,
            interviews: 0
        }
    );
    assert!(handle.is_running());
    assert_eq!(clock.elapsed(), Duration::ZERO);
    handle.stop().await;
}

#[tokio::test]
async fn manual_clock_drives_ticks_without_real_delay() {
    let backend = FakeBackend::new();
    let client = SyncClient::new(Arc::new(backend.clone()));
    let mut events = client.subscribe_events();
    let clock = Arc::new(ManualClock::new());
    let handle = client.start_polling(clock.clone(), INTERVAL);
    events.recv().await.expect("mount tick");

    for tick in 1..=3u64 {
        backend
            .seed_task(&format!("t{tick}"), "request", TaskStatus::Pending)
            .await;
        clock.until_sleeps(tick).await;
        clock.advance(INTERVAL);

        let event = events.recv().await.expect("tick");
        assert_eq!(
            event,
            ClientEvent::SnapshotApplied {
                tasks: tick as usize,
                interviews: 0
            }
        );
    }

    assert_eq!(backend.task_reads().await, 4);
    assert_eq!(clock.elapsed(), INTERVAL * 3);
    handle.stop().await;
}

#[tokio::test]
async fn failed_tick_keeps_snapshot_and_schedule_continues() {
    let backend = FakeBackend::new();
    backend.seed_task("t1", "Leave request", TaskStatus::Pending).await;
    let client = SyncClient::new(Arc::new(backend.clone()));
    let mut events = client.subscribe_events();
    let clock = Arc::new(ManualClock::new());
    let handle = client.start_polling(clock.clone(), INTERVAL);
    events.recv().await.expect("mount tick");
    let before = client.snapshot().await;

    backend.clear().await;
    backend.fail_task_reads(1).await;
    clock.until_sleeps(1).await;
    clock.advance(INTERVAL);
    clock.until_sleeps(2).await;

    assert_eq!(backend.task_reads().await, 2);
    assert_eq!(client.snapshot().await, before);
    assert!(events.try_recv().is_err());

    clock.advance(INTERVAL);
    assert_eq!(
        events.recv().await.expect("recovered tick"),
        ClientEvent::SnapshotApplied {
            tasks: 0,
            interviews: 0
        }
    );
    handle.stop().await;
}

#[tokio::test]
async fn next_tick_waits_a_full_interval_after_the_previous_one() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(ManualClock::new());
    let counter = Arc::clone(&ticks);
    let handle = PollHandle::spawn(clock.clone(), INTERVAL, move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    clock.until_sleeps(1).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    clock.advance(INTERVAL - Duration::from_millis(1));
    settle().await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    clock.advance(Duration::from_millis(1));
    clock.until_sleeps(2).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    handle.stop().await;
}

#[tokio::test]
async fn stopped_schedule_never_touches_state_again() {
    let backend = FakeBackend::new();
    let client = SyncClient::new(Arc::new(backend.clone()));
    let mut events = client.subscribe_events();
    let clock = Arc::new(ManualClock::new());
    let handle = client.start_polling(clock.clone(), INTERVAL);
    events.recv().await.expect("mount tick");
    clock.until_sleeps(1).await;

    handle.stop().await;
    backend.seed_task("t1", "late arrival", TaskStatus::Pending).await;
    clock.advance(INTERVAL * 10);
    settle().await;

    assert_eq!(backend.task_reads().await, 1);
    assert!(client.tasks().await.is_empty());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn dropping_the_handle_stops_the_schedule() {
    let backend = FakeBackend::new();
    let client = SyncClient::new(Arc::new(backend.clone()));
    let mut events = client.subscribe_events();
    let clock = Arc::new(ManualClock::new());
    let handle = client.start_polling(clock.clone(), INTERVAL);
    events.recv().await.expect("mount tick");
    clock.until_sleeps(1).await;

    drop(handle);
    settle().await;
    clock.advance(INTERVAL * 3);
    settle().await;

    assert_eq!(backend.task_reads().await, 1);
}
