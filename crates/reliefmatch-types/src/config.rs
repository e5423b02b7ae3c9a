//! Configuration types for the allocation engine.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Priority-aging thresholds, in hours. These control when a base priority
/// starts escalating, plus the starvation threshold for panic detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingConfig {
    /// Hours before a Low-priority need starts escalating.
    pub low_to_medium_hours: f64,
    /// Hours before a Medium-priority need starts escalating.
    pub medium_to_high_hours: f64,
    /// Hours before a High-priority need starts escalating.
    pub high_to_critical_hours: f64,
    /// Hours a starved effectively-Critical need must wait before panic.
    pub panic_threshold_hours: f64,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            low_to_medium_hours: constants::DEFAULT_LOW_TO_MEDIUM_HOURS,
            medium_to_high_hours: constants::DEFAULT_MEDIUM_TO_HIGH_HOURS,
            high_to_critical_hours: constants::DEFAULT_HIGH_TO_CRITICAL_HOURS,
            panic_threshold_hours: constants::DEFAULT_PANIC_THRESHOLD_HOURS,
        }
    }
}

impl AgingConfig {
    /// Aggressive preset for active disaster response: 6/3/1 hour
    /// thresholds. The panic threshold is unchanged.
    #[must_use]
    pub fn emergency() -> Self {
        Self {
            low_to_medium_hours: constants::EMERGENCY_LOW_TO_MEDIUM_HOURS,
            medium_to_high_hours: constants::EMERGENCY_MEDIUM_TO_HIGH_HOURS,
            high_to_critical_hours: constants::EMERGENCY_HIGH_TO_CRITICAL_HOURS,
            ..Self::default()
        }
    }
}

/// Matching engine knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Distances beyond this contribute no proximity score.
    pub max_proximity_distance_km: f64,
    /// Multiplier on the proximity sub-score.
    pub proximity_weight: f64,
    /// Multiplier on the category sub-score.
    pub category_match_weight: f64,
    /// Whether a need may be advanced without being completed.
    pub allow_partial_fulfillment: bool,
    /// Reject partial allocations whose first slice is below this
    /// percentage of the need's required quantity.
    pub min_partial_fulfillment_percent: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_proximity_distance_km: constants::DEFAULT_MAX_PROXIMITY_DISTANCE_KM,
            proximity_weight: constants::DEFAULT_PROXIMITY_WEIGHT,
            category_match_weight: constants::DEFAULT_CATEGORY_MATCH_WEIGHT,
            allow_partial_fulfillment: true,
            min_partial_fulfillment_percent: constants::DEFAULT_MIN_PARTIAL_FULFILLMENT_PERCENT,
        }
    }
}

/// Dashboard knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Size of the top-critical-missing-items list.
    pub top_critical_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_critical_count: constants::DEFAULT_TOP_CRITICAL_COUNT,
        }
    }
}

/// Audit log knobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// In-memory entry bound; oldest entries are dropped beyond it.
    /// Zero means the default bound.
    pub max_in_memory_logs: usize,
    /// Optional append-mode persistence target (one JSON object per line).
    pub file_path: Option<std::path::PathBuf>,
}

impl AuditConfig {
    /// The effective in-memory bound.
    #[must_use]
    pub fn effective_max_logs(&self) -> usize {
        if self.max_in_memory_logs == 0 {
            constants::DEFAULT_MAX_IN_MEMORY_LOGS
        } else {
            self.max_in_memory_logs
        }
    }
}
