//! Audit event vocabulary and the sink/observer seams.
//!
//! The core never writes logs itself: it emits structured [`AuditEntry`]
//! values through an [`AuditSink`]. The `reliefmatch-audit` crate provides
//! the bounded in-memory implementation; hosts may substitute their own.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::PanicAlert;
use crate::{AuditEntryId, PriorityLevel};

/// Kinds of audit events emitted by the engine and the outer application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventKind {
    NeedCreated,
    NeedUpdated,
    NeedFulfilled,
    SupplyCreated,
    SupplyUpdated,
    SupplyDepleted,
    MatchMade,
    MatchFailed,
    ShipmentCreated,
    ShipmentDispatched,
    ShipmentDelivered,
    ShipmentCancelled,
    PanicModeTriggered,
    SystemAlert,
    UserAction,
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NeedCreated => "NEED_CREATED",
            Self::NeedUpdated => "NEED_UPDATED",
            Self::NeedFulfilled => "NEED_FULFILLED",
            Self::SupplyCreated => "SUPPLY_CREATED",
            Self::SupplyUpdated => "SUPPLY_UPDATED",
            Self::SupplyDepleted => "SUPPLY_DEPLETED",
            Self::MatchMade => "MATCH_MADE",
            Self::MatchFailed => "MATCH_FAILED",
            Self::ShipmentCreated => "SHIPMENT_CREATED",
            Self::ShipmentDispatched => "SHIPMENT_DISPATCHED",
            Self::ShipmentDelivered => "SHIPMENT_DELIVERED",
            Self::ShipmentCancelled => "SHIPMENT_CANCELLED",
            Self::PanicModeTriggered => "PANIC_MODE_TRIGGERED",
            Self::SystemAlert => "SYSTEM_ALERT",
            Self::UserAction => "USER_ACTION",
        };
        write!(f, "{name}")
    }
}

/// Metadata values accepted at the sink boundary. Other shapes are
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Id(Uuid),
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u32> for MetadataValue {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<Uuid> for MetadataValue {
    fn from(v: Uuid) -> Self {
        Self::Id(v)
    }
}

/// One structured audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventKind,
    pub message: String,
    pub entity_id: Option<Uuid>,
    pub entity_type: Option<String>,
    pub user_id: Option<String>,
    pub priority: Option<PriorityLevel>,
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(event_type: AuditEventKind, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: AuditEntryId::new(),
            timestamp: now,
            event_type,
            message: message.into(),
            entity_id: None,
            entity_type: None,
            user_id: None,
            priority: None,
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_entity(mut self, entity_id: Uuid, entity_type: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id);
        self.entity_type = Some(entity_type.into());
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Receives structured events from the engine. Implementations must be safe
/// for concurrent appenders.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

/// A sink that discards everything. Useful for tests and hosts that do not
/// audit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _entry: AuditEntry) {}
}

/// Narrow observer interface for hosts that want synchronous callbacks.
///
/// Both methods default to no-ops so an observer may implement only the
/// hook it cares about. Observers run on the caller's thread and must not
/// block indefinitely; a panicking observer is contained by the caller and
/// reported as a `SystemAlert`.
pub trait ReliefObserver: Send + Sync {
    fn on_log_added(&self, _entry: &AuditEntry) {}
    fn on_panic_mode_triggered(&self, _panicking: &[PanicAlert]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let entity = Uuid::now_v7();
        let entry = AuditEntry::new(AuditEventKind::MatchMade, "matched", Utc::now())
            .with_entity(entity, "Need")
            .with_user("operator-1")
            .with_priority(PriorityLevel::High)
            .with_metadata("quantity", 25u32)
            .with_metadata("score", 0.82);

        assert_eq!(entry.entity_id, Some(entity));
        assert_eq!(entry.entity_type.as_deref(), Some("Need"));
        assert_eq!(entry.metadata["quantity"], MetadataValue::Integer(25));
        assert_eq!(entry.metadata["score"], MetadataValue::Float(0.82));
    }

    #[test]
    fn event_kind_serializes_as_name() {
        let json = serde_json::to_string(&AuditEventKind::PanicModeTriggered).unwrap();
        assert_eq!(json, "\"PanicModeTriggered\"");
        assert_eq!(AuditEventKind::SupplyDepleted.to_string(), "SUPPLY_DEPLETED");
    }

    #[test]
    fn metadata_serializes_untagged() {
        let entry = AuditEntry::new(AuditEventKind::SystemAlert, "x", Utc::now())
            .with_metadata("count", 3i64)
            .with_metadata("flag", true);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"count\":3"));
        assert!(json.contains("\"flag\":true"));
    }
}
