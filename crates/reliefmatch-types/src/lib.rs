//! # reliefmatch-types
//!
//! Shared types, errors, and configuration for the **reliefmatch**
//! disaster-relief allocation engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`NeedId`], [`SupplyId`], [`ShipmentId`], [`AuditEntryId`]
//! - **Entity base**: [`EntityMeta`] (composition, not subtyping)
//! - **Domain model**: [`Need`], [`Supply`], [`Shipment`], [`Location`]
//! - **Matching output**: [`SupplyAllocation`], [`NeedAllocation`], [`MatchingResult`]
//! - **Dashboard output**: [`DashboardSnapshot`], [`PanicAlert`]
//! - **Audit vocabulary**: [`AuditEntry`], [`AuditEventKind`], [`AuditSink`], [`ReliefObserver`]
//! - **Configuration**: [`AgingConfig`], [`MatchingConfig`], [`DashboardConfig`], [`AuditConfig`]
//! - **Errors**: [`ReliefError`] with `RM_ERR_` prefix codes
//! - **Constants**: system-wide defaults and weights

pub mod allocation;
pub mod audit;
pub mod category;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod ids;
pub mod location;
pub mod need;
pub mod shipment;
pub mod supply;

// Re-export all primary types at crate root for ergonomic imports:
//   use reliefmatch_types::{Need, Supply, MatchingResult, ...};

pub use allocation::*;
pub use audit::*;
pub use category::{categories_match, categories_related};
pub use config::*;
pub use dashboard::*;
pub use entity::*;
pub use error::*;
pub use ids::*;
pub use location::*;
pub use need::*;
pub use shipment::*;
pub use supply::*;

// Constants are accessed via `reliefmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
