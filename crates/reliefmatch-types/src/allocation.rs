//! Output of a matching pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{NeedId, SupplyId};

/// One slice allocated from a single supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyAllocation {
    pub supply_id: SupplyId,
    pub supply_name: String,
    pub quantity: u32,
    /// The match score this supply earned against the need.
    pub match_score: f64,
    /// Whether applying this slice left the supply with zero allocatable
    /// stock.
    pub supply_exhausted: bool,
}

/// Everything allocated to one need during a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedAllocation {
    pub need_id: NeedId,
    pub need_title: String,
    pub allocations: Vec<SupplyAllocation>,
    pub allocated_at: DateTime<Utc>,
    /// The need's fulfillment percentage after the pass committed.
    pub fulfillment_percent_after: f64,
}

impl NeedAllocation {
    /// Total quantity allocated to this need across all contributing
    /// supplies.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.allocations.iter().map(|a| a.quantity).sum()
    }

    /// Whether the pass left the need fully fulfilled.
    #[must_use]
    pub fn fully_fulfilled(&self) -> bool {
        self.fulfillment_percent_after >= 100.0
    }
}

/// Result of one atomic matching pass.
///
/// `success = false` means the pass aborted and every recorded quantity
/// change was rolled back; `error` carries the cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
    pub allocations: Vec<NeedAllocation>,
}

impl MatchingResult {
    /// A successful result.
    #[must_use]
    pub fn succeeded(message: impl Into<String>, allocations: Vec<NeedAllocation>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            allocations,
        }
    }

    /// A rolled-back result.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            message: format!("Matching pass aborted: {error}"),
            error: Some(error),
            allocations: Vec::new(),
        }
    }

    /// Total quantity allocated across all needs.
    #[must_use]
    pub fn total_allocated_quantity(&self) -> u32 {
        self.allocations.iter().map(NeedAllocation::total_quantity).sum()
    }

    /// Number of needs the pass left fully fulfilled.
    #[must_use]
    pub fn fully_fulfilled_count(&self) -> usize {
        self.allocations.iter().filter(|a| a.fully_fulfilled()).count()
    }

    /// Number of needs the pass advanced without completing.
    #[must_use]
    pub fn partially_fulfilled_count(&self) -> usize {
        self.allocations.iter().filter(|a| !a.fully_fulfilled()).count()
    }
}
