//! Dashboard snapshot types.
//!
//! The snapshot is plain serializable data: the core computes it, a thin
//! CLI/UI renders it. Panic alerts ride along in the snapshot and are also
//! pushed through the audit sink and observers by the detector.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{NeedId, PriorityLevel};

/// Aggregate counters over non-deleted needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedStats {
    pub total: usize,
    pub fulfilled: usize,
    /// `0 < fulfillment% < 100`.
    pub partially_fulfilled: usize,
    /// `fulfillment% = 0`.
    pub unfulfilled: usize,
    /// `Σ fulfilled / Σ required × 100` across all counted needs.
    pub percent_met: f64,
}

/// Aggregate counters over non-deleted supplies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyStats {
    pub total: usize,
    /// `allocatable = 0`.
    pub depleted: usize,
    /// Below minimum stock but not yet depleted.
    pub low_stock: usize,
}

/// Aggregate counters over non-deleted shipments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentStats {
    pub active: usize,
    /// `Pending | Approved`.
    pub pending: usize,
    /// `InTransit | AtDistributionCenter | OutForDelivery`.
    pub in_transit: usize,
    /// Delivered with an actual-delivery date of today.
    pub delivered_today: usize,
}

/// One entry in the top-critical-missing-items list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalItem {
    pub need_id: NeedId,
    pub title: String,
    pub category: String,
    pub effective_score: f64,
    pub hours_waiting: f64,
    pub remaining: u32,
    pub unit: String,
}

/// A starved effectively-Critical need that tripped panic detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanicAlert {
    pub need_id: NeedId,
    pub title: String,
    pub base_priority: PriorityLevel,
    pub hours_waiting: f64,
    pub threshold_hours: f64,
    pub fulfillment_percent: f64,
}

impl PanicAlert {
    /// Hours past the panic threshold. Alerts sort by this, descending.
    #[must_use]
    pub fn hours_over_threshold(&self) -> f64 {
        self.hours_waiting - self.threshold_hours
    }
}

/// One coherent view of system health at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub needs: NeedStats,
    pub supplies: SupplyStats,
    pub shipments: ShipmentStats,
    pub top_critical: Vec<CriticalItem>,
    /// Per-category `Σ fulfilled / Σ required × 100` over needs.
    pub category_fulfillment: BTreeMap<String, f64>,
    /// Per-category total allocatable quantity over supplies.
    pub category_allocatable: BTreeMap<String, u64>,
    /// Needs currently in panic, sorted by descending hours over threshold.
    pub panicking: Vec<PanicAlert>,
}

impl DashboardSnapshot {
    /// Whether this snapshot carries a panic signal.
    #[must_use]
    pub fn is_panicking(&self) -> bool {
        !self.panicking.is_empty()
    }
}
