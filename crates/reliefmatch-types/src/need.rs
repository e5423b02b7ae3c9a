//! Outstanding relief requests.
//!
//! A [`Need`] tracks a required quantity and a fulfilled quantity. The
//! invariant `0 ≤ fulfilled ≤ required` holds at every observable state;
//! the only mutators are [`Need::add_fulfilled_quantity`] (clamped at
//! `required`) and [`Need::remove_fulfilled_quantity`] (floored at zero,
//! used by the matching transaction to reverse recorded deltas).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EntityMeta, Location, NeedId, ReliefError, Result};

/// Base urgency of a need. More urgent levels order first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// Numeric base score: Critical=0, High=1, Medium=2, Low=3.
    /// Lower is more urgent.
    #[must_use]
    pub fn numeric(self) -> f64 {
        match self {
            Self::Critical => 0.0,
            Self::High => 1.0,
            Self::Medium => 2.0,
            Self::Low => 3.0,
        }
    }

    /// Discrete level for a continuous effective-priority score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.5 {
            Self::Critical
        } else if score < 1.5 {
            Self::High
        } else if score < 2.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// An outstanding request for supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub meta: EntityMeta<NeedId>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: PriorityLevel,
    pub quantity_required: u32,
    pub quantity_fulfilled: u32,
    pub unit: String,
    pub location: Location,
    pub requester: String,
    pub contact: String,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: String,
}

impl Need {
    /// Create a new need.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when `title` or `category` is empty or
    /// `quantity_required` is zero.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        priority: PriorityLevel,
        quantity_required: u32,
        unit: impl Into<String>,
        location: Location,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let title = title.into();
        let category = category.into();
        if title.trim().is_empty() {
            return Err(ReliefError::invalid("need title must not be empty"));
        }
        if category.trim().is_empty() {
            return Err(ReliefError::invalid("need category must not be empty"));
        }
        if quantity_required == 0 {
            return Err(ReliefError::invalid(
                "need quantity_required must be positive",
            ));
        }

        Ok(Self {
            meta: EntityMeta::new(NeedId::new(), now),
            title,
            description: String::new(),
            category,
            priority,
            quantity_required,
            quantity_fulfilled: 0,
            unit: unit.into(),
            location,
            requester: String::new(),
            contact: String::new(),
            deadline: None,
            notes: String::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> NeedId {
        self.meta.id
    }

    /// Quantity still outstanding: `max(0, required − fulfilled)`.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.quantity_required.saturating_sub(self.quantity_fulfilled)
    }

    /// Whether the need has been fully met.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.quantity_fulfilled >= self.quantity_required
    }

    /// Fulfillment percentage, capped at 100.
    #[must_use]
    pub fn fulfillment_percent(&self) -> f64 {
        if self.quantity_required == 0 {
            return 100.0;
        }
        let pct = f64::from(self.quantity_fulfilled) / f64::from(self.quantity_required) * 100.0;
        pct.min(100.0)
    }

    /// Hours until the deadline, negative once past. `None` when no
    /// deadline is set.
    #[must_use]
    pub fn hours_until_deadline(&self, now: DateTime<Utc>) -> Option<f64> {
        self.deadline
            .map(|d| (d - now).num_milliseconds() as f64 / 3_600_000.0)
    }

    /// Record fulfilled quantity, clamped at `quantity_required`.
    ///
    /// Returns `false` (no-op) when `q` is zero.
    pub fn add_fulfilled_quantity(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 {
            return false;
        }
        self.quantity_fulfilled = self
            .quantity_fulfilled
            .saturating_add(q)
            .min(self.quantity_required);
        self.meta.touch(now);
        true
    }

    /// Reverse previously recorded fulfillment, floored at zero. Used by
    /// the matching transaction on rollback.
    ///
    /// Returns `false` (no-op) when `q` is zero.
    pub fn remove_fulfilled_quantity(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 {
            return false;
        }
        self.quantity_fulfilled = self.quantity_fulfilled.saturating_sub(q);
        self.meta.touch(now);
        true
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Need {
    #[must_use]
    pub fn dummy(category: &str, priority: PriorityLevel, required: u32) -> Self {
        Self::new(
            format!("{category} need"),
            category,
            priority,
            required,
            "unit",
            Location::unknown(),
            Utc::now(),
        )
        .expect("dummy need is valid")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn constructor_validates() {
        let now = Utc::now();
        assert!(Need::new("", "Food", PriorityLevel::High, 10, "kg", Location::unknown(), now)
            .is_err());
        assert!(Need::new("x", "", PriorityLevel::High, 10, "kg", Location::unknown(), now)
            .is_err());
        assert!(Need::new("x", "Food", PriorityLevel::High, 0, "kg", Location::unknown(), now)
            .is_err());
        assert!(Need::new("x", "Food", PriorityLevel::High, 10, "kg", Location::unknown(), now)
            .is_ok());
    }

    #[test]
    fn fulfillment_derivations() {
        let mut need = Need::dummy("Food", PriorityLevel::High, 10);
        assert_eq!(need.remaining(), 10);
        assert!(!need.is_fulfilled());
        assert_eq!(need.fulfillment_percent(), 0.0);

        assert!(need.add_fulfilled_quantity(4, Utc::now()));
        assert_eq!(need.remaining(), 6);
        assert!((need.fulfillment_percent() - 40.0).abs() < 1e-9);

        // Clamped at required.
        assert!(need.add_fulfilled_quantity(100, Utc::now()));
        assert_eq!(need.quantity_fulfilled, 10);
        assert!(need.is_fulfilled());
        assert_eq!(need.fulfillment_percent(), 100.0);
    }

    #[test]
    fn zero_quantity_mutations_are_noops() {
        let mut need = Need::dummy("Food", PriorityLevel::High, 10);
        let before = need.meta.updated_at;
        assert!(!need.add_fulfilled_quantity(0, Utc::now() + Duration::seconds(5)));
        assert!(!need.remove_fulfilled_quantity(0, Utc::now() + Duration::seconds(5)));
        assert_eq!(need.meta.updated_at, before);
    }

    #[test]
    fn remove_fulfilled_floors_at_zero() {
        let mut need = Need::dummy("Food", PriorityLevel::High, 10);
        need.add_fulfilled_quantity(3, Utc::now());
        assert!(need.remove_fulfilled_quantity(100, Utc::now()));
        assert_eq!(need.quantity_fulfilled, 0);
    }

    #[test]
    fn priority_numeric_and_from_score() {
        assert_eq!(PriorityLevel::Critical.numeric(), 0.0);
        assert_eq!(PriorityLevel::Low.numeric(), 3.0);
        assert_eq!(PriorityLevel::from_score(0.49), PriorityLevel::Critical);
        assert_eq!(PriorityLevel::from_score(0.5), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(1.5), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(2.5), PriorityLevel::Low);
    }

    #[test]
    fn priority_orders_most_urgent_first() {
        assert!(PriorityLevel::Critical < PriorityLevel::High);
        assert!(PriorityLevel::High < PriorityLevel::Low);
    }

    #[test]
    fn deadline_hours() {
        let now = Utc::now();
        let mut need = Need::dummy("Food", PriorityLevel::High, 10);
        assert!(need.hours_until_deadline(now).is_none());
        need.deadline = Some(now + Duration::hours(3));
        let h = need.hours_until_deadline(now).unwrap();
        assert!((h - 3.0).abs() < 1e-6);
        need.deadline = Some(now - Duration::hours(2));
        assert!(need.hours_until_deadline(now).unwrap() < 0.0);
    }
}
