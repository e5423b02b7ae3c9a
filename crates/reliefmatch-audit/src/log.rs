//! Bounded in-memory audit log.
//!
//! The buffer lives behind a single mutex; appenders may race freely and
//! readers clone out defensive copies. The in-memory bound evicts oldest
//! entries first, so memory stays predictable in long-running hosts.
//!
//! File persistence, when configured, is best-effort append (one JSON
//! object per line). Write failures are swallowed after a warning — they
//! must never crash a caller that was only trying to allocate supplies.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use reliefmatch_types::{
    AuditConfig, AuditEntry, AuditEventKind, AuditSink, ReliefError, ReliefObserver, Result,
};

/// In-memory audit log with bounded retention and optional file append.
pub struct AuditLog {
    entries: Mutex<VecDeque<AuditEntry>>,
    max_entries: usize,
    file_path: Option<PathBuf>,
    observers: Vec<Arc<dyn ReliefObserver>>,
}

impl AuditLog {
    #[must_use]
    pub fn new(config: AuditConfig) -> Self {
        let max_entries = config.effective_max_logs();
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_entries.min(1024))),
            max_entries,
            file_path: config.file_path,
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers run synchronously on the appending
    /// thread, after the entry is stored.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ReliefObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Append an entry: store it, best-effort persist it, then notify
    /// observers. A panicking observer is contained and recorded as a
    /// `SystemAlert` (without re-notifying observers).
    pub fn append(&self, entry: AuditEntry) {
        self.store(entry.clone());
        self.append_to_file(&entry);

        for observer in &self.observers {
            let outcome = catch_unwind(AssertUnwindSafe(|| observer.on_log_added(&entry)));
            if outcome.is_err() {
                tracing::warn!(entry = %entry.id, "log observer panicked; discarded");
                self.store(AuditEntry::new(
                    AuditEventKind::SystemAlert,
                    "log observer panicked; discarded",
                    Utc::now(),
                ));
            }
        }
    }

    fn store(&self, entry: AuditEntry) {
        let mut entries = self.lock();
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    fn append_to_file(&self, entry: &AuditEntry) {
        let Some(path) = &self.file_path else {
            return;
        };
        if let Err(err) = append_line(path, entry) {
            tracing::warn!(path = %path.display(), error = %err, "audit file append failed");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<AuditEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =================================================================
    // Queries — all return newest-first defensive copies
    // =================================================================

    /// The most recent `n` entries.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<AuditEntry> {
        self.lock().iter().rev().take(n).cloned().collect()
    }

    /// All retained entries of one kind.
    #[must_use]
    pub fn by_type(&self, kind: AuditEventKind) -> Vec<AuditEntry> {
        self.lock()
            .iter()
            .rev()
            .filter(|e| e.event_type == kind)
            .cloned()
            .collect()
    }

    /// All retained entries within `[start, end]` (inclusive).
    #[must_use]
    pub fn by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<AuditEntry> {
        self.lock()
            .iter()
            .rev()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // =================================================================
    // Bulk export
    // =================================================================

    /// Pretty-printed JSON array of all retained entries, oldest first.
    ///
    /// # Errors
    /// Returns `Serialization` when encoding fails.
    pub fn export_json(&self) -> Result<String> {
        let entries: Vec<AuditEntry> = self.lock().iter().cloned().collect();
        serde_json::to_string_pretty(&entries)
            .map_err(|e| ReliefError::Serialization(e.to_string()))
    }

    /// Write the bulk export to a file.
    ///
    /// # Errors
    /// Returns `Serialization` or `Io` on failure. Unlike the append path,
    /// export is an explicit operator action and surfaces its errors.
    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        let json = self.export_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl AuditSink for AuditLog {
    fn record(&self, entry: AuditEntry) {
        self.append(entry);
    }
}

fn append_line(path: &Path, entry: &AuditEntry) -> Result<()> {
    let line =
        serde_json::to_string(entry).map_err(|e| ReliefError::Serialization(e.to_string()))?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;

    use super::*;

    fn entry(kind: AuditEventKind, message: &str) -> AuditEntry {
        AuditEntry::new(kind, message, Utc::now())
    }

    fn small_log(max: usize) -> AuditLog {
        AuditLog::new(AuditConfig {
            max_in_memory_logs: max,
            file_path: None,
        })
    }

    #[test]
    fn append_and_recent_newest_first() {
        let log = small_log(10);
        log.append(entry(AuditEventKind::NeedCreated, "first"));
        log.append(entry(AuditEventKind::NeedUpdated, "second"));
        log.append(entry(AuditEventKind::NeedFulfilled, "third"));

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "third");
        assert_eq!(recent[1].message, "second");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn bound_drops_oldest() {
        let log = small_log(3);
        for i in 0..5 {
            log.append(entry(AuditEventKind::UserAction, &format!("m{i}")));
        }
        assert_eq!(log.len(), 3);
        let recent = log.recent(10);
        assert_eq!(recent[0].message, "m4");
        assert_eq!(recent[2].message, "m2", "m0 and m1 were evicted");
    }

    #[test]
    fn by_type_filters() {
        let log = small_log(10);
        log.append(entry(AuditEventKind::MatchMade, "a"));
        log.append(entry(AuditEventKind::MatchFailed, "b"));
        log.append(entry(AuditEventKind::MatchMade, "c"));

        let made = log.by_type(AuditEventKind::MatchMade);
        assert_eq!(made.len(), 2);
        assert_eq!(made[0].message, "c");
    }

    #[test]
    fn by_time_range_is_inclusive() {
        let log = small_log(10);
        let t0 = Utc::now();
        let mut e1 = entry(AuditEventKind::UserAction, "early");
        e1.timestamp = t0;
        let mut e2 = entry(AuditEventKind::UserAction, "late");
        e2.timestamp = t0 + Duration::hours(2);
        log.append(e1);
        log.append(e2);

        let hits = log.by_time_range(t0, t0 + Duration::hours(1));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].message, "early");

        let all = log.by_time_range(t0, t0 + Duration::hours(2));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn observer_fires_after_append() {
        struct Counter(AtomicUsize);
        impl ReliefObserver for Counter {
            fn on_log_added(&self, _entry: &AuditEntry) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let log = small_log(10).with_observer(counter.clone());
        log.append(entry(AuditEventKind::UserAction, "x"));
        log.append(entry(AuditEventKind::UserAction, "y"));
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_observer_is_contained() {
        struct Exploder;
        impl ReliefObserver for Exploder {
            fn on_log_added(&self, _entry: &AuditEntry) {
                panic!("observer bug");
            }
        }

        let log = small_log(10).with_observer(Arc::new(Exploder));
        log.append(entry(AuditEventKind::UserAction, "x"));

        // The original entry plus the SystemAlert about the observer.
        assert_eq!(log.len(), 2);
        assert_eq!(log.by_type(AuditEventKind::SystemAlert).len(), 1);
    }

    #[test]
    fn file_append_writes_one_json_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let log = AuditLog::new(AuditConfig {
            max_in_memory_logs: 10,
            file_path: Some(path.clone()),
        });
        log.append(entry(AuditEventKind::MatchMade, "a"));
        log.append(entry(AuditEventKind::MatchFailed, "b"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: AuditEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.message, "a");
    }

    #[test]
    fn file_write_failure_is_swallowed() {
        let log = AuditLog::new(AuditConfig {
            max_in_memory_logs: 10,
            file_path: Some(PathBuf::from("/nonexistent-dir/audit.jsonl")),
        });
        // Must not panic; the entry is still retained in memory.
        log.append(entry(AuditEventKind::UserAction, "x"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn export_json_is_a_pretty_array_oldest_first() {
        let log = small_log(10);
        log.append(entry(AuditEventKind::NeedCreated, "first"));
        log.append(entry(AuditEventKind::NeedUpdated, "second"));

        let json = log.export_json().unwrap();
        assert!(json.trim_start().starts_with('['));
        assert!(json.contains('\n'), "pretty-printed");
        let parsed: Vec<AuditEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].message, "first");
        assert_eq!(parsed[1].message, "second");
    }

    #[test]
    fn export_to_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let log = small_log(10);
        log.append(entry(AuditEventKind::UserAction, "x"));
        log.export_to_file(&path).unwrap();

        let parsed: Vec<AuditEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
