//! Integration tests: dashboard snapshots and the panic signal
//!
//! MATCH → SNAPSHOT → PANIC
//!
//! The panic signal is level-triggered: every snapshot with a non-empty
//! panic set emits one audit event and one observer callback, and a second
//! snapshot over the same input emits again.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Duration, Utc};
use reliefmatch_core::{Dashboard, MatchingEngine};
use reliefmatch_types::{
    AuditEntry, AuditEventKind, AuditSink, Location, Need, PanicAlert, PriorityLevel,
    ReliefObserver, Supply,
};

/// Captures every entry pushed through the sink.
#[derive(Default)]
struct CaptureSink(Mutex<Vec<AuditEntry>>);

impl AuditSink for CaptureSink {
    fn record(&self, entry: AuditEntry) {
        self.0.lock().unwrap().push(entry);
    }
}

#[derive(Default)]
struct CountingObserver {
    panics_seen: AtomicUsize,
    needs_in_last_call: AtomicUsize,
}

impl ReliefObserver for CountingObserver {
    fn on_panic_mode_triggered(&self, panicking: &[PanicAlert]) {
        self.panics_seen.fetch_add(1, Ordering::SeqCst);
        self.needs_in_last_call
            .store(panicking.len(), Ordering::SeqCst);
    }
}

struct ExplodingObserver;

impl ReliefObserver for ExplodingObserver {
    fn on_panic_mode_triggered(&self, _panicking: &[PanicAlert]) {
        panic!("observer bug");
    }
}

fn starved_critical(now: chrono::DateTime<Utc>) -> Need {
    Need::new(
        "insulin",
        "Medical",
        PriorityLevel::Critical,
        50,
        "vials",
        Location::unknown(),
        now - Duration::minutes(90),
    )
    .unwrap()
}

#[test]
fn starved_critical_need_triggers_panic_event_and_observer_once() {
    let now = Utc::now();
    let dash = Dashboard::default();
    let sink = CaptureSink::default();
    let observer = CountingObserver::default();

    let needs = vec![starved_critical(now)];
    let snap = dash.snapshot(&needs, &[], &[], now, &sink, &[&observer]);

    assert!(snap.is_panicking());
    assert_eq!(snap.panicking.len(), 1);
    assert_eq!(snap.panicking[0].fulfillment_percent, 0.0);

    let entries = sink.0.lock().unwrap();
    let panic_events: Vec<_> = entries
        .iter()
        .filter(|e| e.event_type == AuditEventKind::PanicModeTriggered)
        .collect();
    assert_eq!(panic_events.len(), 1, "exactly one event per snapshot");
    assert_eq!(observer.panics_seen.load(Ordering::SeqCst), 1);
    assert_eq!(observer.needs_in_last_call.load(Ordering::SeqCst), 1);
}

#[test]
fn second_snapshot_emits_again() {
    let now = Utc::now();
    let dash = Dashboard::default();
    let sink = CaptureSink::default();
    let observer = CountingObserver::default();

    let needs = vec![starved_critical(now)];
    dash.snapshot(&needs, &[], &[], now, &sink, &[&observer]);
    dash.snapshot(&needs, &[], &[], now, &sink, &[&observer]);

    let entries = sink.0.lock().unwrap();
    let panic_events = entries
        .iter()
        .filter(|e| e.event_type == AuditEventKind::PanicModeTriggered)
        .count();
    assert_eq!(panic_events, 2, "snapshots are stateless, not edge-triggered");
    assert_eq!(observer.panics_seen.load(Ordering::SeqCst), 2);
}

#[test]
fn panicking_observer_is_contained_and_reported() {
    let now = Utc::now();
    let dash = Dashboard::default();
    let sink = CaptureSink::default();
    let healthy = CountingObserver::default();

    let needs = vec![starved_critical(now)];
    let snap = dash.snapshot(&needs, &[], &[], now, &sink, &[&ExplodingObserver, &healthy]);

    // The snapshot survives and later observers still run.
    assert!(snap.is_panicking());
    assert_eq!(healthy.panics_seen.load(Ordering::SeqCst), 1);

    let entries = sink.0.lock().unwrap();
    assert!(
        entries
            .iter()
            .any(|e| e.event_type == AuditEventKind::SystemAlert),
        "observer panic surfaces as a SystemAlert"
    );
}

#[test]
fn matched_need_stops_panicking() {
    let now = Utc::now();
    let engine = MatchingEngine::default();
    let dash = Dashboard::default();
    let sink = CaptureSink::default();

    let mut needs = vec![starved_critical(now)];
    let mut supplies = vec![Supply::dummy("Medical", 100)];

    let before = dash.snapshot(&needs, &supplies, &[], now, &sink, &[]);
    assert!(before.is_panicking());

    let result = engine.run(&mut needs, &mut supplies, now, &sink);
    assert!(result.success);
    assert!(needs[0].is_fulfilled());

    let after = dash.snapshot(&needs, &supplies, &[], now, &sink, &[]);
    assert!(!after.is_panicking(), "fulfilled needs never panic");
    assert_eq!(after.needs.fulfilled, 1);

    let entries = sink.0.lock().unwrap();
    assert!(entries
        .iter()
        .any(|e| e.event_type == AuditEventKind::MatchMade));
    assert!(entries
        .iter()
        .any(|e| e.event_type == AuditEventKind::NeedFulfilled));
}

#[test]
fn snapshot_serializes_for_external_renderers() {
    let now = Utc::now();
    let dash = Dashboard::default();
    let needs = vec![starved_critical(now)];
    let snap = dash.snapshot(&needs, &[], &[], now, &reliefmatch_types::NullSink, &[]);

    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"panicking\""));
    assert!(json.contains("insulin"));
}
