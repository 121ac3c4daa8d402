//! Unit tests for the tracker
//!
//! Loop state is driven directly through `ProgressAccumulator`; the engine
//! is driven through in-memory fakes of every host collaborator.

#![allow(clippy::panic)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    store::StoreError,
    tracker::{
        Backoff, Clock, DiscoveryGate, ENABLED_KEY, EXPLORED_TRACKS_KEY, EnabledFlag,
        ExploredRegistry, HostError, PersistenceStore, PlaybackController, PlayerSnapshot,
        PlayerStateProvider, ProgressAccumulator, RawSnapshot, SnapshotReader, SystemClock, Tracker,
        TrackerError, TrackerHost, TrackerSettings, TrackProgressState, Transition,
        TransitionKind, load_enabled, save_enabled, wait_until_ready,
    },
};

const THRESHOLD: u64 = 30_000;

fn snapshot(track_id: &str, is_playing: bool, timestamp_ms: u64) -> PlayerSnapshot {
    PlayerSnapshot {
        track_id: track_id.to_string(),
        is_playing,
        position_ms: 0,
        timestamp_ms,
    }
}

fn playing(track_id: &str, timestamp_ms: u64) -> Option<PlayerSnapshot> {
    Some(snapshot(track_id, true, timestamp_ms))
}

fn paused(track_id: &str, timestamp_ms: u64) -> Option<PlayerSnapshot> {
    Some(snapshot(track_id, false, timestamp_ms))
}

fn raw_playing(track_id: &str, timestamp_ms: u64) -> RawSnapshot {
    RawSnapshot {
        track_id: Some(track_id.to_string()),
        is_paused: Some(false),
        position_ms: Some(0),
        timestamp_ms: Some(timestamp_ms),
    }
}

#[derive(Default)]
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<Option<RawSnapshot>, HostError>>>,
}

impl ScriptedProvider {
    fn push(&self, response: Result<Option<RawSnapshot>, HostError>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl PlayerStateProvider for ScriptedProvider {
    async fn read(&self) -> Result<Option<RawSnapshot>, HostError> {
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

#[derive(Default)]
struct RecordingController {
    calls: AtomicUsize,
    fail: AtomicBool,
}

#[async_trait]
impl PlaybackController for RecordingController {
    async fn next(&self) -> Result<(), HostError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(HostError::CallFailed("no reply".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: "state.json".into(),
                details: "disk full".to_string(),
            });
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Default)]
struct ManualClock(AtomicU64);

impl ManualClock {
    fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

struct Switch(AtomicBool);

impl EnabledFlag for Switch {
    fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Harness {
    provider: Arc<ScriptedProvider>,
    controller: Arc<RecordingController>,
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    enabled: Arc<Switch>,
}

impl Harness {
    fn new() -> Self {
        Self {
            provider: Arc::new(ScriptedProvider::default()),
            controller: Arc::new(RecordingController::default()),
            store: Arc::new(MemoryStore::default()),
            clock: Arc::new(ManualClock::default()),
            enabled: Arc::new(Switch(AtomicBool::new(true))),
        }
    }

    fn seed_registry(&self, tracks: &[&str]) {
        ExploredRegistry::update(self.store.as_ref(), |registry| {
            tracks.iter().for_each(|track| {
                registry.insert(*track);
            });
            true
        })
        .unwrap();
    }

    fn tracker(&self, threshold_ms: u64) -> Tracker {
        let settings = TrackerSettings {
            threshold_ms,
            poll_interval: Duration::from_millis(1),
            readiness_backoff: Backoff::new(Duration::from_millis(1), Duration::from_millis(2)),
        };

        Tracker::new(
            settings,
            TrackerHost {
                provider: self.provider.clone(),
                controller: self.controller.clone(),
                store: self.store.clone(),
                enabled: self.enabled.clone(),
                clock: self.clock.clone(),
            },
        )
    }

    fn skips(&self) -> usize {
        self.controller.calls.load(Ordering::SeqCst)
    }
}

#[test]
fn reader_disabled_yields_nothing() {
    let result = SnapshotReader::read(Some(raw_playing("a", 0)), false).unwrap();
    assert_eq!(result, None);
}

#[test]
fn reader_nothing_loaded_yields_nothing() {
    assert_eq!(SnapshotReader::read(None, true).unwrap(), None);

    let no_track = RawSnapshot {
        track_id: Some(String::new()),
        ..RawSnapshot::default()
    };
    assert_eq!(SnapshotReader::read(Some(no_track), true).unwrap(), None);
    assert_eq!(
        SnapshotReader::read(Some(RawSnapshot::default()), true).unwrap(),
        None
    );
}

#[test]
fn reader_normalizes_pause_flag() {
    let raw = RawSnapshot {
        is_paused: Some(true),
        position_ms: Some(1_200),
        ..raw_playing("a", 7)
    };

    let snapshot = SnapshotReader::read(Some(raw), true).unwrap().unwrap();

    assert_eq!(snapshot.track_id, "a");
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.position_ms, 1_200);
    assert_eq!(snapshot.timestamp_ms, 7);
}

#[test]
fn reader_missing_fields_are_data_integrity_errors() {
    let cases = [
        (
            RawSnapshot {
                is_paused: None,
                ..raw_playing("a", 0)
            },
            "pause state",
        ),
        (
            RawSnapshot {
                position_ms: None,
                ..raw_playing("a", 0)
            },
            "position",
        ),
        (
            RawSnapshot {
                timestamp_ms: None,
                ..raw_playing("a", 0)
            },
            "event timestamp",
        ),
    ];

    for (raw, field) in cases {
        let error = SnapshotReader::read(Some(raw), true).unwrap_err();
        assert_eq!(
            error,
            TrackerError::DataIntegrity {
                track_id: "a".to_string(),
                missing: field,
            }
        );
    }
}

#[test]
fn transition_kinds() {
    let a0 = snapshot("a", true, 0);
    let a1 = snapshot("a", true, 1);
    let b1 = snapshot("b", true, 1);

    assert_eq!(
        Transition::classify(Some(&a0), Some(&a0)).kind(),
        TransitionKind::SameState
    );
    assert_eq!(
        Transition::classify(Some(&a0), Some(&a1)).kind(),
        TransitionKind::Advance
    );
    assert_eq!(
        Transition::classify(Some(&a0), Some(&b1)).kind(),
        TransitionKind::TrackChange
    );
    assert_eq!(
        Transition::classify(None, Some(&a0)).kind(),
        TransitionKind::TrackChange
    );
    assert_eq!(
        Transition::classify(Some(&a0), None).kind(),
        TransitionKind::Stopped
    );

    let idle = Transition::classify(None, None);
    assert!(!idle.track_changed);
    assert!(!idle.same_state);
    assert_eq!(idle.kind(), TransitionKind::Stopped);
    assert_eq!(TransitionKind::SameState.to_string(), "same-state");
}

#[test]
fn same_timestamp_on_different_tracks_is_track_change() {
    let transition =
        Transition::classify(Some(&snapshot("a", true, 5)), Some(&snapshot("b", true, 5)));

    assert!(transition.same_state);
    assert!(transition.track_changed);
    assert_eq!(transition.kind(), TransitionKind::TrackChange);
}

#[test]
fn total_is_monotonic_while_playing() {
    let mut accumulator = ProgressAccumulator::new(u64::MAX);
    let mut last_total = 0;

    for (ts, now) in [(0, 0), (0, 100), (1_000, 1_000), (1_000, 1_900), (4_000, 4_000)] {
        accumulator.advance(playing("a", ts), now);

        let total = accumulator.progress().total_accrued_ms;
        assert!(total >= last_total);
        last_total = total;
    }

    assert_eq!(last_total, 4_000);
}

#[test]
fn discovery_after_threshold_of_host_events() {
    let mut accumulator = ProgressAccumulator::new(THRESHOLD);

    let first = accumulator.advance(playing("A", 0), 0);
    assert_eq!(first.entered.as_deref(), Some("A"));
    assert_eq!(first.discovered, None);

    let second = accumulator.advance(playing("A", 10_000), 10_000);
    assert_eq!(second.kind, TransitionKind::Advance);
    assert_eq!(second.discovered, None);
    assert_eq!(accumulator.progress().total_accrued_ms, 10_000);

    let third = accumulator.advance(playing("A", 31_000), 31_000);
    assert_eq!(third.discovered.as_deref(), Some("A"));
    assert_eq!(accumulator.progress().total_accrued_ms, 31_000);
    assert!(accumulator.progress().already_marked);
}

#[test]
fn discovery_fires_at_most_once_per_session() {
    let mut accumulator = ProgressAccumulator::new(1_000);
    accumulator.advance(playing("a", 0), 0);

    let mut discoveries = 0;
    for step in 1..20u64 {
        let advance = accumulator.advance(playing("a", step * 1_000), step * 1_000);
        if advance.discovered.is_some() {
            discoveries += 1;
        }
    }

    assert_eq!(discoveries, 1);
    assert_eq!(accumulator.progress().total_accrued_ms, 1_000);
}

#[test]
fn track_change_resets_progress() {
    let mut accumulator = ProgressAccumulator::new(THRESHOLD);
    accumulator.advance(playing("A", 0), 0);
    accumulator.advance(playing("A", 10_000), 10_000);

    let change = accumulator.advance(playing("B", 10_050), 10_050);

    assert_eq!(change.kind, TransitionKind::TrackChange);
    assert_eq!(change.discovered, None);
    assert_eq!(change.entered.as_deref(), Some("B"));
    assert_eq!(*accumulator.progress(), TrackProgressState::default());
    assert_eq!(accumulator.previous().map(|s| s.track_id.as_str()), Some("B"));
}

#[test]
fn no_double_counting_across_rough_estimates() {
    let mut accumulator = ProgressAccumulator::new(u64::MAX);
    accumulator.advance(playing("a", 0), 0);

    accumulator.advance(playing("a", 0), 500);
    accumulator.advance(playing("a", 0), 1_400);
    assert_eq!(accumulator.progress().rough_accrued_ms, 1_400);
    assert_eq!(accumulator.progress().total_accrued_ms, 0);

    accumulator.advance(playing("a", 1_500), 1_500);
    assert_eq!(accumulator.progress().rough_accrued_ms, 0);

    accumulator.advance(playing("a", 1_500), 3_000);
    accumulator.advance(playing("a", 4_000), 4_000);

    assert_eq!(accumulator.progress().total_accrued_ms, 4_000);
}

#[test]
fn rough_estimate_triggers_discovery_without_event() {
    let mut accumulator = ProgressAccumulator::new(THRESHOLD);
    accumulator.advance(playing("a", 0), 0);

    let early = accumulator.advance(playing("a", 0), 29_999);
    assert_eq!(early.discovered, None);

    let crossed = accumulator.advance(playing("a", 0), 30_000);
    assert_eq!(crossed.kind, TransitionKind::SameState);
    assert_eq!(crossed.discovered.as_deref(), Some("a"));
    assert_eq!(accumulator.progress().total_accrued_ms, 0);
}

#[test]
fn stop_commits_rough_estimate_and_resets() {
    let mut accumulator = ProgressAccumulator::new(5_000);
    accumulator.advance(playing("a", 0), 0);
    accumulator.advance(playing("a", 0), 4_000);

    let stop = accumulator.advance(None, 9_000);

    assert_eq!(stop.kind, TransitionKind::Stopped);
    assert_eq!(stop.committed_ms, 4_000);
    assert_eq!(stop.discovered, None);
    assert_eq!(stop.entered, None);
    assert_eq!(*accumulator.progress(), TrackProgressState::default());
    assert!(accumulator.previous().is_none());
}

#[test]
fn stop_right_after_threshold_rough_discovers() {
    let mut accumulator = ProgressAccumulator::new(5_000);
    accumulator.advance(playing("a", 0), 0);
    accumulator.advance(playing("a", 0), 5_000);

    assert!(accumulator.progress().already_marked);
    let stop = accumulator.advance(None, 6_000);
    assert_eq!(stop.discovered, None);
    assert_eq!(stop.committed_ms, 0);
}

#[test]
fn stop_after_host_event_commits_nothing_more() {
    let mut accumulator = ProgressAccumulator::new(u64::MAX);
    accumulator.advance(playing("a", 0), 0);
    accumulator.advance(playing("a", 0), 2_500);
    let event = accumulator.advance(playing("a", 3_000), 3_000);
    assert_eq!(event.committed_ms, 3_000);

    let stop = accumulator.advance(None, 3_050);

    assert_eq!(stop.committed_ms, 0);
}

#[test]
fn track_change_commit_crossing_threshold_discovers_previous_track() {
    let mut accumulator = ProgressAccumulator::new(THRESHOLD);
    accumulator.advance(playing("A", 0), 0);
    accumulator.advance(playing("A", 10_000), 10_000);

    let change = accumulator.advance(playing("B", 31_000), 31_000);

    assert_eq!(change.kind, TransitionKind::TrackChange);
    assert_eq!(change.committed_ms, 21_000);
    assert_eq!(change.discovered.as_deref(), Some("A"));
    assert_eq!(change.entered.as_deref(), Some("B"));
    assert_eq!(*accumulator.progress(), TrackProgressState::default());
}

#[tokio::test]
async fn track_change_discovers_previous_and_skips_explored_next() {
    let harness = Harness::new();
    harness.seed_registry(&["B"]);
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Ok(Some(raw_playing("B", 31_000))));
    harness.clock.set(0);
    tracker.cycle().await.unwrap();
    harness.clock.set(31_000);
    let report = tracker.cycle().await.unwrap().unwrap();

    assert_eq!(report.advance.discovered.as_deref(), Some("A"));
    assert!(report.skipped);
    assert!(tracker.registry().contains("A"));
    assert!(tracker.registry().contains("B"));
    assert_eq!(harness.skips(), 1);
}

#[test]
fn system_clock_never_goes_backwards() {
    let clock = SystemClock::new();
    let mut last = clock.now_ms();

    for _ in 0..1_000 {
        let now = clock.now_ms();
        assert!(now >= last);
        last = now;
    }

    std::thread::sleep(Duration::from_millis(20));
    assert!(clock.now_ms() >= last + 20);
}

#[test]
fn paused_time_does_not_accrue() {
    let mut accumulator = ProgressAccumulator::new(u64::MAX);
    accumulator.advance(paused("a", 0), 0);
    accumulator.advance(paused("a", 0), 20_000);
    assert_eq!(accumulator.progress().estimated_ms(), 0);

    accumulator.advance(playing("a", 20_000), 20_000);
    assert_eq!(accumulator.progress().total_accrued_ms, 0);

    accumulator.advance(paused("a", 23_000), 23_000);
    assert_eq!(accumulator.progress().total_accrued_ms, 3_000);

    accumulator.advance(paused("a", 23_000), 40_000);
    assert_eq!(accumulator.progress().estimated_ms(), 3_000);
}

#[test]
fn clock_going_backwards_saturates() {
    let mut accumulator = ProgressAccumulator::new(u64::MAX);
    accumulator.advance(playing("a", 10_000), 10_000);
    accumulator.advance(playing("a", 10_000), 5_000);

    assert_eq!(accumulator.progress().rough_accrued_ms, 0);

    accumulator.advance(playing("a", 8_000), 12_000);
    assert_eq!(accumulator.progress().total_accrued_ms, 0);
}

#[test]
fn registry_has_set_semantics() {
    let store = MemoryStore::default();
    let mut registry = ExploredRegistry::new();

    assert!(registry.insert("b"));
    assert!(registry.insert("a"));
    assert!(!registry.insert("a"));
    assert_eq!(registry.len(), 2);

    let stored = ExploredRegistry::update(&store, |stored| {
        for track in registry.iter() {
            stored.insert(track);
        }
        true
    })
    .unwrap();
    assert_eq!(
        store.get(EXPLORED_TRACKS_KEY).as_deref(),
        Some(r#"["a","b"]"#)
    );
    assert_eq!(stored, registry);

    let writes = store.writes.load(Ordering::SeqCst);
    let unchanged = ExploredRegistry::update(&store, |stored| stored.insert("a")).unwrap();
    assert_eq!(unchanged, registry);
    assert_eq!(store.writes.load(Ordering::SeqCst), writes);

    assert_eq!(ExploredRegistry::load(&store), registry);
}

#[test]
fn registry_remove_and_clear() {
    let mut registry = ExploredRegistry::new();
    registry.insert("a");
    registry.insert("b");

    assert!(registry.remove("a"));
    assert!(!registry.remove("a"));
    assert_eq!(registry.iter().collect::<Vec<_>>(), vec!["b"]);

    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn registry_corrupt_entry_loads_empty() {
    let store = MemoryStore::default();
    store
        .set(EXPLORED_TRACKS_KEY, "{not a list".to_string())
        .unwrap();

    assert!(ExploredRegistry::load(&store).is_empty());
}

#[test]
fn gate_marks_once_and_persists() {
    let store = Arc::new(MemoryStore::default());
    let mut gate = DiscoveryGate::load(store.clone());

    assert!(gate.mark("a"));
    let writes = store.writes.load(Ordering::SeqCst);
    let persisted = store.get(EXPLORED_TRACKS_KEY);

    assert!(!gate.mark("a"));
    assert_eq!(store.writes.load(Ordering::SeqCst), writes);
    assert_eq!(store.get(EXPLORED_TRACKS_KEY), persisted);
    assert_eq!(gate.registry().len(), 1);
}

#[test]
fn gate_keeps_in_memory_state_when_persisting_fails() {
    let store = Arc::new(MemoryStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let mut gate = DiscoveryGate::load(store.clone());

    assert!(gate.mark("a"));
    assert!(gate.registry().contains("a"));
    assert_eq!(store.get(EXPLORED_TRACKS_KEY), None);
}

#[test]
fn enabled_flag_defaults_to_true() {
    let store = MemoryStore::default();
    assert!(load_enabled(&store));

    save_enabled(&store, false).unwrap();
    assert!(!load_enabled(&store));
    assert_eq!(store.get(ENABLED_KEY).as_deref(), Some("false"));

    store.set(ENABLED_KEY, "maybe".to_string()).unwrap();
    assert!(load_enabled(&store));
}

#[test]
fn backoff_doubles_up_to_max() {
    let backoff = Backoff::new(Duration::from_millis(250), Duration::from_millis(5_000));

    let delays: Vec<u128> = (1..=7).map(|a| backoff.delay(a).as_millis()).collect();

    assert_eq!(delays, vec![250, 500, 1_000, 2_000, 4_000, 5_000, 5_000]);
    assert_eq!(backoff.delay(200), Duration::from_millis(5_000));
}

#[test]
fn backoff_max_never_below_initial() {
    let backoff = Backoff::new(Duration::from_millis(300), Duration::from_millis(100));

    assert_eq!(backoff.delay(1), Duration::from_millis(300));
    assert_eq!(backoff.delay(4), Duration::from_millis(300));
}

#[tokio::test]
async fn readiness_retries_until_probe_succeeds() {
    let probes = AtomicUsize::new(0);
    let backoff = Backoff::new(Duration::from_millis(1), Duration::from_millis(2));

    let attempts = wait_until_ready(
        || {
            let seen = probes.fetch_add(1, Ordering::SeqCst);
            async move { seen >= 2 }
        },
        backoff,
    )
    .await;

    assert_eq!(attempts, 3);
    assert_eq!(probes.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn engine_discovers_and_persists() {
    let harness = Harness::new();
    let mut tracker = harness.tracker(THRESHOLD);

    for ts in [0, 10_000, 31_000] {
        harness.provider.push(Ok(Some(raw_playing("A", ts))));
    }

    for now in [0, 10_000, 31_000] {
        harness.clock.set(now);
        tracker.cycle().await.unwrap();
    }

    assert!(tracker.registry().contains("A"));
    assert!(ExploredRegistry::load(harness.store.as_ref()).contains("A"));
    assert_eq!(harness.skips(), 0);
}

#[tokio::test]
async fn engine_skips_explored_track_on_entry() {
    let harness = Harness::new();
    harness.seed_registry(&["A"]);
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(raw_playing("B", 0))));
    harness.provider.push(Ok(Some(raw_playing("A", 100))));

    let first = tracker.cycle().await.unwrap().unwrap();
    assert!(!first.skipped);

    harness.clock.set(100);
    let second = tracker.cycle().await.unwrap().unwrap();

    assert_eq!(second.advance.kind, TransitionKind::TrackChange);
    assert_eq!(second.advance.entered.as_deref(), Some("A"));
    assert!(second.skipped);
    assert_eq!(harness.skips(), 1);
    assert_eq!(tracker.accumulator().progress().estimated_ms(), 0);
}

#[tokio::test]
async fn engine_skips_only_on_track_entry() {
    let harness = Harness::new();
    harness.seed_registry(&["A"]);
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Ok(Some(raw_playing("C", 50))));

    for _ in 0..3 {
        tracker.cycle().await.unwrap();
    }

    assert_eq!(harness.skips(), 1);
}

#[tokio::test]
async fn engine_skip_failure_is_not_fatal() {
    let harness = Harness::new();
    harness.seed_registry(&["A"]);
    harness.controller.fail.store(true, Ordering::SeqCst);
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(raw_playing("A", 0))));

    let report = tracker.cycle().await.unwrap().unwrap();
    assert!(report.skipped);
    assert_eq!(harness.skips(), 1);
}

#[tokio::test]
async fn engine_poll_failure_skips_cycle() {
    let harness = Harness::new();
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Err(HostError::Unavailable("gone".to_string())));

    tracker.cycle().await.unwrap();
    let before = tracker.accumulator().clone();

    harness.clock.set(5_000);
    assert_eq!(tracker.cycle().await.unwrap(), None);

    assert_eq!(tracker.accumulator().previous(), before.previous());
    assert_eq!(tracker.accumulator().progress(), before.progress());
}

#[tokio::test]
async fn engine_disabled_behaves_as_stop() {
    let harness = Harness::new();
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Ok(Some(raw_playing("A", 0))));

    tracker.cycle().await.unwrap();

    harness.enabled.0.store(false, Ordering::SeqCst);
    harness.clock.set(40_000);
    let report = tracker.cycle().await.unwrap().unwrap();

    assert_eq!(report.advance.kind, TransitionKind::Stopped);
    assert!(tracker.accumulator().previous().is_none());

    harness.clock.set(80_000);
    let report = tracker.cycle().await.unwrap().unwrap();
    assert_eq!(report.advance.discovered, None);
    assert!(tracker.registry().is_empty());
}

#[tokio::test]
async fn engine_data_integrity_is_fatal() {
    let harness = Harness::new();
    let mut tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(Some(RawSnapshot {
        position_ms: None,
        ..raw_playing("A", 0)
    })));

    let error = tracker.cycle().await.unwrap_err();
    assert!(matches!(error, TrackerError::DataIntegrity { missing: "position", .. }));
}

#[tokio::test]
async fn engine_run_returns_fatal_error() {
    let harness = Harness::new();
    let tracker = harness.tracker(THRESHOLD);

    harness.provider.push(Ok(None));
    harness.provider.push(Ok(Some(RawSnapshot {
        timestamp_ms: None,
        ..raw_playing("A", 0)
    })));

    let probes = AtomicUsize::new(0);
    let result = tracker
        .run(|| {
            let seen = probes.fetch_add(1, Ordering::SeqCst);
            async move { seen >= 1 }
        })
        .await;

    assert!(matches!(
        result,
        Err(TrackerError::DataIntegrity {
            missing: "event timestamp",
            ..
        })
    ));
    assert_eq!(probes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn engine_reloads_registry_on_external_change() {
    let harness = Harness::new();
    let (changes_tx, changes_rx) = watch::channel(0u64);
    let mut tracker = harness.tracker(THRESHOLD).with_external_changes(changes_rx);

    harness.provider.push(Ok(Some(raw_playing("B", 0))));
    tracker.cycle().await.unwrap();
    assert!(tracker.registry().is_empty());

    harness.seed_registry(&["A"]);
    changes_tx.send(1).unwrap();

    harness.provider.push(Ok(Some(raw_playing("A", 10))));
    let report = tracker.cycle().await.unwrap().unwrap();

    assert!(tracker.registry().contains("A"));
    assert!(report.skipped);
}

#[tokio::test]
async fn engine_external_reset_allows_rediscovery() {
    let harness = Harness::new();
    harness.seed_registry(&["A"]);
    let (changes_tx, changes_rx) = watch::channel(0u64);
    let mut tracker = harness.tracker(1_000).with_external_changes(changes_rx);

    harness.seed_registry(&[]);
    changes_tx.send(1).unwrap();

    harness.provider.push(Ok(Some(raw_playing("A", 0))));
    harness.provider.push(Ok(Some(raw_playing("A", 1_000))));

    let entry = tracker.cycle().await.unwrap().unwrap();
    assert!(!entry.skipped);

    harness.clock.set(1_000);
    let report = tracker.cycle().await.unwrap().unwrap();
    assert_eq!(report.advance.discovered.as_deref(), Some("A"));
    assert!(tracker.registry().contains("A"));
}
