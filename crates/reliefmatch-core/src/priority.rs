//! Effective-priority scoring and ordering.
//!
//! Maps a [`Need`] to a continuous urgency score in `[0, 3]` where **lower
//! is more urgent**, combining four factors:
//!
//! 1. Base level (Critical=0 … Low=3)
//! 2. Aging: `min(L, log2(waited/T + 1))` once `waited` exceeds the
//!    threshold `T` for the base level — a smooth, bounded escalation
//! 3. Deadline pressure: +2.0 past deadline, +1.0 within 6 h, +0.5 within 24 h
//! 4. Near-completion: +0.5 at ≥ 80 % fulfillment (finish what is almost done)
//!
//! Bonuses *subtract* from the score (smaller = more urgent) and the result
//! is clamped to `[0, 3]`. Aging never makes a need less urgent than its
//! base level.

use chrono::{DateTime, Utc};
use reliefmatch_types::constants::{
    DEADLINE_IMMINENT_BONUS, DEADLINE_NEAR_BONUS, DEADLINE_PAST_BONUS, NEAR_COMPLETION_BONUS,
    NEAR_COMPLETION_THRESHOLD_PERCENT,
};
use reliefmatch_types::{AgingConfig, Need, PriorityLevel};

/// Computes effective urgency scores and priority-ordered views of needs.
#[derive(Debug, Clone, Default)]
pub struct PriorityManager {
    aging: AgingConfig,
}

impl PriorityManager {
    #[must_use]
    pub fn new(aging: AgingConfig) -> Self {
        Self { aging }
    }

    #[must_use]
    pub fn aging_config(&self) -> &AgingConfig {
        &self.aging
    }

    /// Continuous urgency score for a need. Lower is more urgent.
    #[must_use]
    pub fn effective_score(&self, need: &Need, now: DateTime<Utc>) -> f64 {
        let base = need.priority.numeric();
        let waited = need.meta.hours_since_created(now);

        let aging_bonus = self.aging_bonus(need.priority, waited);

        let deadline_bonus = match need.hours_until_deadline(now) {
            Some(h) if h <= 0.0 => DEADLINE_PAST_BONUS,
            Some(h) if h <= 6.0 => DEADLINE_IMMINENT_BONUS,
            Some(h) if h <= 24.0 => DEADLINE_NEAR_BONUS,
            _ => 0.0,
        };

        let completion_bonus = if need.fulfillment_percent() >= NEAR_COMPLETION_THRESHOLD_PERCENT
            && !need.is_fulfilled()
        {
            NEAR_COMPLETION_BONUS
        } else {
            0.0
        };

        (base - aging_bonus - deadline_bonus - completion_bonus).clamp(0.0, 3.0)
    }

    /// Discrete level derived from the effective score, for display and
    /// gating.
    #[must_use]
    pub fn effective_level(&self, need: &Need, now: DateTime<Utc>) -> PriorityLevel {
        PriorityLevel::from_score(self.effective_score(need, now))
    }

    /// Hours a need has waited so far.
    #[must_use]
    pub fn hours_waiting(&self, need: &Need, now: DateTime<Utc>) -> f64 {
        need.meta.hours_since_created(now)
    }

    fn aging_bonus(&self, base: PriorityLevel, waited: f64) -> f64 {
        // Threshold and maximum escalation per base level. Critical cannot
        // escalate further.
        let (threshold, max_escalation) = match base {
            PriorityLevel::Low => (self.aging.low_to_medium_hours, 3.0),
            PriorityLevel::Medium => (self.aging.medium_to_high_hours, 2.0),
            PriorityLevel::High => (self.aging.high_to_critical_hours, 1.0),
            PriorityLevel::Critical => return 0.0,
        };
        if waited <= threshold {
            return 0.0;
        }
        (waited / threshold + 1.0).log2().min(max_escalation)
    }

    /// Priority-ordered view of `needs`: ascending score, ties broken by
    /// creation timestamp (older first). Soft-deleted needs are always
    /// excluded; fulfilled needs are excluded when `skip_fulfilled` is set.
    #[must_use]
    pub fn prioritize<'a>(
        &self,
        needs: &'a [Need],
        now: DateTime<Utc>,
        skip_fulfilled: bool,
    ) -> Vec<&'a Need> {
        self.order_indices(needs, now, skip_fulfilled)
            .into_iter()
            .map(|i| &needs[i])
            .collect()
    }

    /// Index form of [`prioritize`](Self::prioritize), excluding fulfilled
    /// needs. Used by the matching engine, which needs mutable access to
    /// the underlying slice while walking the order.
    #[must_use]
    pub fn prioritize_indices(&self, needs: &[Need], now: DateTime<Utc>) -> Vec<usize> {
        self.order_indices(needs, now, true)
    }

    fn order_indices(&self, needs: &[Need], now: DateTime<Utc>, skip_fulfilled: bool) -> Vec<usize> {
        let mut scored: Vec<(usize, f64)> = needs
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.meta.is_deleted && !(skip_fulfilled && n.is_fulfilled()))
            .map(|(i, n)| (i, self.effective_score(n, now)))
            .collect();

        // Stable sort; the explicit timestamp tie-break keeps the order
        // deterministic regardless of input permutation.
        scored.sort_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then_with(|| needs[a.0].meta.created_at.cmp(&needs[b.0].meta.created_at))
        });
        scored.into_iter().map(|(i, _)| i).collect()
    }
}
