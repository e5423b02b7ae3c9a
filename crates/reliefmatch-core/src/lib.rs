//! # reliefmatch-core
//!
//! Core allocation engine for the **reliefmatch** disaster-relief
//! logistics coordinator.
//!
//! This crate provides the four tightly coupled pieces of the core:
//!
//! - [`PriorityManager`]: effective-urgency scoring with time-based aging,
//!   deadline pressure, and near-completion bias
//! - [`MatchingEngine`]: atomic matching pass with multi-factor scoring and
//!   all-or-nothing rollback
//! - [`AllocationTransaction`]: the in-memory quantity ledger backing the
//!   rollback guarantee
//! - [`Dashboard`]: snapshot aggregation and the panic signal for starved
//!   critical needs
//!
//! ## Matching cycle
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌────────────┐
//! │ PRIORITIZE │────▶│   MATCH    │────▶│   COMMIT   │
//! │            │     │            │     │            │
//! │ Needs →    │     │ score,     │     │ mutations  │
//! │ urgency    │     │ reserve,   │     │ stick,     │
//! │ order      │     │ deduct     │     │ events fire│
//! └────────────┘     └─────┬──────┘     └────────────┘
//!                          │ any failure
//!                          ▼
//!                    ┌────────────┐
//!                    │  ROLLBACK  │  every touched entity restored
//!                    └────────────┘
//! ```
//!
//! The engine owns no entities: the caller supplies `&mut [Need]` /
//! `&mut [Supply]` working sets per pass and is responsible for serializing
//! passes. All computation is synchronous and free of I/O; only the audit
//! sink may block, off the hot path.

pub mod dashboard;
pub mod matcher;
pub mod priority;
pub mod score;
pub mod transaction;

pub use dashboard::Dashboard;
pub use matcher::MatchingEngine;
pub use priority::PriorityManager;
pub use score::match_score;
pub use transaction::AllocationTransaction;
