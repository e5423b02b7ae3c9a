//! Common entity record shared by every domain entity.
//!
//! Identifier and creation time are immutable after construction. The update
//! timestamp is bumped by every mutator. Soft deletion is idempotent and
//! excludes the entity from matching, prioritization, and dashboard
//! aggregation, while keeping it retrievable by identifier.
//!
//! Embedded by value (composition), never by subtype — no dispatch depends
//! on the base record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity, timestamps, and soft-delete flag carried by every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta<Id> {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl<Id> EntityMeta<Id> {
    /// Fresh metadata stamped with the given creation instant.
    #[must_use]
    pub fn new(id: Id, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Bump the update timestamp. Called by every mutator.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Soft-delete. Idempotent: a second call leaves `is_deleted = true`
    /// and still bumps the update timestamp.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.touch(now);
    }

    /// Hours elapsed since creation, as fractional hours. Never negative.
    #[must_use]
    pub fn hours_since_created(&self, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.created_at).num_milliseconds() as f64 / 1000.0;
        (secs / 3600.0).max(0.0)
    }
}
