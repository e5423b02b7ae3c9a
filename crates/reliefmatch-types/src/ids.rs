//! Globally unique identifiers used throughout reliefmatch.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting.
//! IDs are assigned at construction and never reassigned.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for an outstanding relief request.
    NeedId,
    "need"
);

entity_id!(
    /// Unique identifier for an inventory supply line.
    SupplyId,
    "supply"
);

entity_id!(
    /// Unique identifier for a shipment.
    ShipmentId,
    "shipment"
);

entity_id!(
    /// Unique identifier for an audit log entry.
    AuditEntryId,
    "audit"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_uniqueness() {
        assert_ne!(NeedId::new(), NeedId::new());
        assert_ne!(SupplyId::new(), SupplyId::new());
    }

    #[test]
    fn id_ordering_is_time_ordered() {
        let a = NeedId::new();
        let b = NeedId::new();
        assert!(a < b);
    }

    #[test]
    fn display_carries_prefix() {
        let id = NeedId::new();
        assert!(format!("{id}").starts_with("need:"));
        let id = SupplyId::new();
        assert!(format!("{id}").starts_with("supply:"));
    }

    #[test]
    fn serde_roundtrips() {
        let id = NeedId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: NeedId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
