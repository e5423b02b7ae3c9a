//! Multi-factor match scoring for (need, supply) pairs.
//!
//! The category sub-score is a hard cut: a supply whose category neither
//! matches nor relates to the need's scores zero and is ineligible. The
//! remaining factors only rank eligible supplies:
//!
//! - proximity (linear falloff to `max_proximity_distance_km`)
//! - stock ratio (prefer supplies covering more of the remainder, capped)
//! - expiring-soon bonus (use perishable stock first)

use chrono::{DateTime, Utc};
use reliefmatch_types::constants::{EXPIRING_SOON_BONUS, STOCK_RATIO_WEIGHT};
use reliefmatch_types::{categories_match, categories_related, MatchingConfig, Need, Supply};

/// Score a candidate supply against a need. Returns `0.0` when the supply
/// is ineligible (category mismatch).
#[must_use]
pub fn match_score(
    need: &Need,
    supply: &Supply,
    config: &MatchingConfig,
    now: DateTime<Utc>,
) -> f64 {
    let category_factor = if categories_match(&need.category, &supply.category) {
        1.0
    } else if categories_related(&need.category, &supply.category) {
        0.5
    } else {
        return 0.0;
    };
    let mut score = category_factor * config.category_match_weight;

    // Unknown coordinates on either side contribute nothing, without
    // affecting eligibility.
    if let Some(distance) = need.location.distance_km(&supply.storage_location) {
        let proximity = (1.0 - distance / config.max_proximity_distance_km).max(0.0);
        score += proximity * config.proximity_weight;
    }

    let remaining = need.remaining();
    if remaining > 0 {
        let ratio = (f64::from(supply.allocatable()) / f64::from(remaining)).min(1.0);
        score += ratio * STOCK_RATIO_WEIGHT;
    }

    if supply.is_expiring_soon(now) {
        score += EXPIRING_SOON_BONUS;
    }

    score
}
