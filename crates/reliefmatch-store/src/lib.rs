//! # reliefmatch-store
//!
//! Per-type async storage seam for the outer application. The core never
//! touches storage: it works on in-memory slices the host loads and saves
//! through an [`EntityStore`].
//!
//! Semantics:
//!
//! - `save` is an upsert keyed by the entity identifier
//! - `load_all` returns non-soft-deleted items only (entities carry their
//!   own soft-delete flag; `get_by_id` still returns flagged ones)
//! - `delete_by_id` is a hard delete at the storage tier
//!
//! All operations are asynchronous; cancellation is Rust-native — dropping
//! the returned future abandons the operation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use reliefmatch_types::{Need, NeedId, Result, Shipment, ShipmentId, Supply, SupplyId};

/// An entity the store can persist: identified, cloneable, soft-deletable.
pub trait Persistable: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Ord + Hash + Send + Sync;

    fn persist_id(&self) -> Self::Id;
    fn is_soft_deleted(&self) -> bool;
}

impl Persistable for Need {
    type Id = NeedId;

    fn persist_id(&self) -> NeedId {
        self.id()
    }

    fn is_soft_deleted(&self) -> bool {
        self.meta.is_deleted
    }
}

impl Persistable for Supply {
    type Id = SupplyId;

    fn persist_id(&self) -> SupplyId {
        self.id()
    }

    fn is_soft_deleted(&self) -> bool {
        self.meta.is_deleted
    }
}

impl Persistable for Shipment {
    type Id = ShipmentId;

    fn persist_id(&self) -> ShipmentId {
        self.id()
    }

    fn is_soft_deleted(&self) -> bool {
        self.meta.is_deleted
    }
}

/// Generic per-type store. Implementations decide durability; the core
/// only relies on the upsert/load semantics above.
#[async_trait]
pub trait EntityStore<T: Persistable>: Send + Sync {
    /// Upsert a batch.
    async fn save_all(&self, items: &[T]) -> Result<()>;

    /// All non-soft-deleted items, ordered by identifier.
    async fn load_all(&self) -> Result<Vec<T>>;

    /// Upsert one item, keyed by its identifier.
    async fn save(&self, item: &T) -> Result<()>;

    /// Hard-delete by identifier. Returns whether anything was removed.
    async fn delete_by_id(&self, id: T::Id) -> Result<bool>;

    /// Fetch by identifier, soft-deleted items included.
    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>>;

    async fn exists_by_id(&self, id: T::Id) -> Result<bool>;

    /// Remove everything.
    async fn clear(&self) -> Result<()>;
}

/// In-memory reference implementation, for tests and single-process hosts.
pub struct MemoryStore<T: Persistable> {
    items: Mutex<HashMap<T::Id, T>>,
}

impl<T: Persistable> MemoryStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<T::Id, T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Persistable> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Persistable> EntityStore<T> for MemoryStore<T> {
    async fn save_all(&self, items: &[T]) -> Result<()> {
        let mut map = self.lock();
        for item in items {
            map.insert(item.persist_id(), item.clone());
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<T>> {
        let mut items: Vec<T> = self
            .lock()
            .values()
            .filter(|item| !item.is_soft_deleted())
            .cloned()
            .collect();
        items.sort_by_key(Persistable::persist_id);
        Ok(items)
    }

    async fn save(&self, item: &T) -> Result<()> {
        self.lock().insert(item.persist_id(), item.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: T::Id) -> Result<bool> {
        Ok(self.lock().remove(&id).is_some())
    }

    async fn get_by_id(&self, id: T::Id) -> Result<Option<T>> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn exists_by_id(&self, id: T::Id) -> Result<bool> {
        Ok(self.lock().contains_key(&id))
    }

    async fn clear(&self) -> Result<()> {
        self.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use reliefmatch_types::PriorityLevel;

    use super::*;

    #[tokio::test]
    async fn save_is_upsert() {
        let store: MemoryStore<Need> = MemoryStore::new();
        let mut need = Need::dummy("Food", PriorityLevel::High, 10);
        store.save(&need).await.unwrap();

        need.add_fulfilled_quantity(5, Utc::now());
        store.save(&need).await.unwrap();

        let loaded = store.get_by_id(need.id()).await.unwrap().unwrap();
        assert_eq!(loaded.quantity_fulfilled, 5);
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn load_all_skips_soft_deleted_but_get_by_id_finds_them() {
        let store: MemoryStore<Need> = MemoryStore::new();
        let live = Need::dummy("Food", PriorityLevel::High, 10);
        let mut gone = Need::dummy("Food", PriorityLevel::High, 10);
        gone.meta.mark_deleted(Utc::now());

        store.save_all(&[live.clone(), gone.clone()]).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), live.id());

        let fetched = store.get_by_id(gone.id()).await.unwrap();
        assert!(fetched.is_some(), "soft-deleted stays retrievable by id");
        assert!(store.exists_by_id(gone.id()).await.unwrap());
    }

    #[tokio::test]
    async fn load_all_orders_by_identifier() {
        let store: MemoryStore<Supply> = MemoryStore::new();
        let a = Supply::dummy("Food", 1);
        let b = Supply::dummy("Food", 2);
        let c = Supply::dummy("Food", 3);
        // UUIDv7 ids are time-ordered; saving out of order must not matter.
        store.save_all(&[c.clone(), a.clone(), b.clone()]).await.unwrap();

        let ids: Vec<_> = store
            .load_all()
            .await
            .unwrap()
            .iter()
            .map(Supply::id)
            .collect();
        assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let store: MemoryStore<Shipment> = MemoryStore::new();
        let s = Shipment::dummy(5);
        store.save(&s).await.unwrap();

        assert!(store.delete_by_id(s.id()).await.unwrap());
        assert!(!store.delete_by_id(s.id()).await.unwrap(), "second delete is a no-op");
        assert!(!store.exists_by_id(s.id()).await.unwrap());

        store.save(&s).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }
}
