//! Shipments and their status state machine.
//!
//! Permitted forward transitions:
//!
//! ```text
//! Pending → Approved → InTransit → AtDistributionCenter → OutForDelivery → Delivered
//!                          │                                      ▲
//!                          └──────────────────────────────────────┘
//!                          └──────────────→ Delivered
//! ```
//!
//! From any non-`Delivered` state, `Cancelled` and `Failed` are reachable.
//! Everything else is rejected: the transition returns `false` and the
//! shipment is unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::TRACKING_CODE_PREFIX;
use crate::{EntityMeta, Location, NeedId, PriorityLevel, ReliefError, Result, ShipmentId, SupplyId};

/// Lifecycle status of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Pending,
    Approved,
    InTransit,
    AtDistributionCenter,
    OutForDelivery,
    Delivered,
    Cancelled,
    Failed,
}

impl ShipmentStatus {
    /// Whether this is a terminal status (no further forward progress).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Failed)
    }

    /// Whether a transition from `self` to `to` is permitted.
    #[must_use]
    pub fn can_transition_to(self, to: ShipmentStatus) -> bool {
        use ShipmentStatus::*;
        // Abort paths: anything except Delivered may be cancelled or failed.
        if matches!(to, Cancelled | Failed) {
            return self != Delivered;
        }
        matches!(
            (self, to),
            (Pending, Approved)
                | (Approved, InTransit)
                | (InTransit, AtDistributionCenter)
                | (InTransit, OutForDelivery)
                | (InTransit, Delivered)
                | (AtDistributionCenter, OutForDelivery)
                | (OutForDelivery, Delivered)
        )
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::InTransit => write!(f, "IN_TRANSIT"),
            Self::AtDistributionCenter => write!(f, "AT_DISTRIBUTION_CENTER"),
            Self::OutForDelivery => write!(f, "OUT_FOR_DELIVERY"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// A shipment moving allocated supplies toward a need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub meta: EntityMeta<ShipmentId>,
    /// Human-readable display code. Not a uniqueness key — the entity
    /// identifier is.
    pub tracking_code: String,
    pub status: ShipmentStatus,
    pub priority: PriorityLevel,
    pub need_id: Option<NeedId>,
    pub supply_id: Option<SupplyId>,
    pub origin: Location,
    pub destination: Location,
    pub quantity: u32,
    pub scheduled_dispatch: Option<DateTime<Utc>>,
    pub actual_dispatch: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub carrier: String,
    pub vehicle: String,
    pub driver: String,
    pub recipient: String,
    pub notes: String,
    pub proof_of_delivery: String,
}

impl Shipment {
    /// Create a new shipment in `Pending` status with a generated tracking
    /// code.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when `quantity` is zero.
    pub fn new(
        origin: Location,
        destination: Location,
        quantity: u32,
        priority: PriorityLevel,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if quantity == 0 {
            return Err(ReliefError::invalid("shipment quantity must be positive"));
        }

        Ok(Self {
            meta: EntityMeta::new(ShipmentId::new(), now),
            tracking_code: generate_tracking_code(now),
            status: ShipmentStatus::Pending,
            priority,
            need_id: None,
            supply_id: None,
            origin,
            destination,
            quantity,
            scheduled_dispatch: None,
            actual_dispatch: None,
            estimated_arrival: None,
            actual_delivery: None,
            carrier: String::new(),
            vehicle: String::new(),
            driver: String::new(),
            recipient: String::new(),
            notes: String::new(),
            proof_of_delivery: String::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> ShipmentId {
        self.meta.id
    }

    /// Whether the shipment is still in flight (not delivered, cancelled,
    /// or failed).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether an active shipment has blown past its estimated arrival.
    #[must_use]
    pub fn is_delayed(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.estimated_arrival.is_some_and(|eta| eta < now)
    }

    /// Attempt a status transition.
    ///
    /// Side effects on success: entering `InTransit` sets `actual_dispatch`
    /// if unset (first entry wins); entering `Delivered` always sets
    /// `actual_delivery`; the update timestamp is bumped.
    ///
    /// Returns `false` with state unchanged when the transition is not
    /// permitted.
    pub fn transition_to(&mut self, to: ShipmentStatus, now: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(to) {
            return false;
        }

        self.status = to;
        match to {
            ShipmentStatus::InTransit => {
                if self.actual_dispatch.is_none() {
                    self.actual_dispatch = Some(now);
                }
            }
            ShipmentStatus::Delivered => {
                self.actual_delivery = Some(now);
            }
            _ => {}
        }
        self.meta.touch(now);
        true
    }
}

/// `DL-<UTC yyyyMMddHHmmss>-<6 uppercase hex>`, the suffix drawn from a
/// fresh random 128-bit identifier. A time-ordered UUIDv7 would not do
/// here: its leading hex characters are timestamp bits and barely vary, so
/// the suffix would stop discriminating codes minted in the same second.
/// Collision-tolerant either way: a display code, never a key.
fn generate_tracking_code(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!(
        "{}-{}-{}",
        TRACKING_CODE_PREFIX,
        now.format("%Y%m%d%H%M%S"),
        suffix
    )
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Shipment {
    #[must_use]
    pub fn dummy(quantity: u32) -> Self {
        Self::new(
            Location::unknown(),
            Location::unknown(),
            quantity,
            PriorityLevel::Medium,
            Utc::now(),
        )
        .expect("dummy shipment is valid")
    }
}
