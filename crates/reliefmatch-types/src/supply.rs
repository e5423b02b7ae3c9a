//! Inventory supply lines.
//!
//! A [`Supply`] tracks an `available` quantity and a `reserved` quantity
//! with the invariant `0 ≤ reserved ≤ available` at every observable state.
//! The matching lifecycle for one allocated slice is:
//!
//! 1. [`Supply::reserve`] — slice moves into `reserved`
//! 2. [`Supply::deduct_stock`] — slice leaves `available` (and `reserved`)
//!
//! All mutators report preconditions booleanly: they return `false` and
//! leave state unchanged instead of panicking.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::EXPIRING_SOON_WINDOW_DAYS;
use crate::{EntityMeta, Location, ReliefError, Result, SupplyId};

/// Physical condition of stocked items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCondition {
    #[default]
    New,
    Good,
    Fair,
    Damaged,
}

impl std::fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::Good => write!(f, "GOOD"),
            Self::Fair => write!(f, "FAIR"),
            Self::Damaged => write!(f, "DAMAGED"),
        }
    }
}

/// An inventory line at a storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub meta: EntityMeta<SupplyId>,
    pub name: String,
    pub category: String,
    pub available: u32,
    pub reserved: u32,
    pub unit: String,
    pub storage_location: Location,
    pub supplier: String,
    pub expiration: Option<DateTime<Utc>>,
    pub minimum_stock: u32,
    pub sku: String,
    pub condition: ItemCondition,
}

impl Supply {
    /// Create a new supply line.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when `name` or `category` is empty.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        available: u32,
        unit: impl Into<String>,
        storage_location: Location,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into();
        let category = category.into();
        if name.trim().is_empty() {
            return Err(ReliefError::invalid("supply name must not be empty"));
        }
        if category.trim().is_empty() {
            return Err(ReliefError::invalid("supply category must not be empty"));
        }

        Ok(Self {
            meta: EntityMeta::new(SupplyId::new(), now),
            name,
            category,
            available,
            reserved: 0,
            unit: unit.into(),
            storage_location,
            supplier: String::new(),
            expiration: None,
            minimum_stock: 0,
            sku: String::new(),
            condition: ItemCondition::default(),
        })
    }

    #[must_use]
    pub fn id(&self) -> SupplyId {
        self.meta.id
    }

    /// Quantity free to allocate: `available − reserved`, floored at zero.
    #[must_use]
    pub fn allocatable(&self) -> u32 {
        self.available.saturating_sub(self.reserved)
    }

    /// Whether the expiration date has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| exp < now)
    }

    /// Whether the supply expires within the soon window (7 days), and has
    /// not already expired.
    #[must_use]
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| {
            exp >= now && exp <= now + Duration::days(EXPIRING_SOON_WINDOW_DAYS)
        })
    }

    /// Whether allocatable stock has fallen below the minimum-stock
    /// threshold.
    #[must_use]
    pub fn is_below_minimum_stock(&self) -> bool {
        self.allocatable() < self.minimum_stock
    }

    // =================================================================
    // Quantity mutators (§ inventory mutation protocol)
    // =================================================================

    /// Reserve `q` units out of allocatable stock.
    ///
    /// Precondition: `0 < q ≤ allocatable`. Returns `false` (no-op)
    /// otherwise.
    pub fn reserve(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 || q > self.allocatable() {
            return false;
        }
        self.reserved += q;
        self.meta.touch(now);
        true
    }

    /// Release `q` previously reserved units back to allocatable stock.
    ///
    /// Precondition: `0 < q ≤ reserved`. Returns `false` (no-op) otherwise.
    pub fn release_reservation(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 || q > self.reserved {
            return false;
        }
        self.reserved -= q;
        self.meta.touch(now);
        true
    }

    /// Remove `q` units from stock. Decrements `reserved` by `q` only when
    /// `reserved ≥ q`; a naked deduction without a prior reservation leaves
    /// `reserved` untouched.
    ///
    /// Precondition: `0 < q ≤ available`. Returns `false` (no-op) otherwise.
    pub fn deduct_stock(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 || q > self.available {
            return false;
        }
        self.available -= q;
        if self.reserved >= q {
            self.reserved -= q;
        }
        self.meta.touch(now);
        true
    }

    /// Add `q` units to available stock.
    ///
    /// Precondition: `q > 0`. Returns `false` (no-op) otherwise.
    pub fn add_stock(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 {
            return false;
        }
        self.available = self.available.saturating_add(q);
        self.meta.touch(now);
        true
    }

    /// Restock after a delivery: add `q` to available and clear all
    /// reservations.
    ///
    /// Precondition: `q > 0`. Returns `false` (no-op) otherwise.
    pub fn resupply(&mut self, q: u32, now: DateTime<Utc>) -> bool {
        if q == 0 {
            return false;
        }
        self.available = self.available.saturating_add(q);
        self.reserved = 0;
        self.meta.touch(now);
        true
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Supply {
    #[must_use]
    pub fn dummy(category: &str, available: u32) -> Self {
        Self::new(
            format!("{category} supply"),
            category,
            available,
            "unit",
            Location::unknown(),
            Utc::now(),
        )
        .expect("dummy supply is valid")
    }
}
