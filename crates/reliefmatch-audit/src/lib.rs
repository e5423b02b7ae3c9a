//! # reliefmatch-audit
//!
//! Audit log backend for the reliefmatch engine: a bounded, mutex-guarded
//! in-memory buffer implementing the core's
//! [`AuditSink`](reliefmatch_types::AuditSink) seam, with synchronous
//! observer callbacks, newest-first query operations, and optional
//! best-effort file persistence.
//!
//! Hosts that need a different backend (database, message bus) implement
//! `AuditSink` themselves; nothing in the core depends on this crate.

pub mod log;

pub use log::AuditLog;
