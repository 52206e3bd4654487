//! In-memory implementation of the GrantStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use shareable_core::{EntityRef, Grant, GrantId, NewGrant};

use crate::error::{Result, StoreError};
use crate::traits::GrantStore;

/// In-memory grant store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// uniqueness check and the insert share one write lock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Grants indexed by ID, in creation order.
    grants: BTreeMap<GrantId, Grant>,

    /// Uniqueness index: (resource, grantee) -> grant_id.
    by_key: HashMap<(EntityRef, EntityRef), GrantId>,

    /// Last assigned id.
    last_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    /// Number of stored grants.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.grants.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn collect<F>(&self, filter: F) -> Result<Vec<Grant>>
    where
        F: Fn(&Grant) -> bool,
    {
        let inner = self.read()?;
        Ok(inner.grants.values().filter(|g| filter(*g)).cloned().collect())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GrantStore for MemoryStore {
    async fn find_grant(
        &self,
        resource: &EntityRef,
        grantee: &EntityRef,
    ) -> Result<Option<Grant>> {
        let inner = self.read()?;
        let key = (resource.clone(), grantee.clone());
        Ok(inner
            .by_key
            .get(&key)
            .and_then(|id| inner.grants.get(id))
            .cloned())
    }

    async fn create_grant(&self, grant: &NewGrant) -> Result<Grant> {
        grant.validate()?;

        let mut inner = self.write()?;
        let key = (grant.resource.clone(), grant.grantee.clone());
        if inner.by_key.contains_key(&key) {
            return Err(StoreError::Conflict {
                resource: grant.resource.clone(),
                grantee: grant.grantee.clone(),
            });
        }

        inner.last_id += 1;
        let id = GrantId(inner.last_id);
        let stored = grant.clone().into_grant(id);

        inner.by_key.insert(key, id);
        inner.grants.insert(id, stored.clone());

        Ok(stored)
    }

    async fn update_grant_edit(&self, grant: &Grant, edit: bool) -> Result<Grant> {
        let mut inner = self.write()?;
        let stored = inner
            .grants
            .get_mut(&grant.id)
            .ok_or(StoreError::NotFound(grant.id))?;
        stored.edit = edit;
        Ok(stored.clone())
    }

    async fn delete_grant(&self, grant: &Grant) -> Result<bool> {
        let mut inner = self.write()?;
        match inner.grants.remove(&grant.id) {
            Some(removed) => {
                inner
                    .by_key
                    .remove(&(removed.resource, removed.grantee));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_grant(
        &self,
        resource: &EntityRef,
        grantee: &EntityRef,
        edit: Option<bool>,
    ) -> Result<bool> {
        let found = self.find_grant(resource, grantee).await?;
        Ok(match (found, edit) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(grant), Some(flag)) => grant.edit == flag,
        })
    }

    async fn grants_for_resource(&self, resource: &EntityRef) -> Result<Vec<Grant>> {
        self.collect(|g| &g.resource == resource)
    }

    async fn grants_from(&self, grantor: &EntityRef) -> Result<Vec<Grant>> {
        self.collect(|g| &g.grantor == grantor)
    }

    async fn grants_to(&self, grantee: &EntityRef) -> Result<Vec<Grant>> {
        self.collect(|g| &g.grantee == grantee)
    }

    async fn delete_grants_for_resource(&self, resource: &EntityRef) -> Result<u64> {
        let mut inner = self.write()?;
        let before = inner.grants.len();

        inner.grants.retain(|_, g| &g.resource != resource);
        inner.by_key.retain(|(r, _), _| r != resource);

        Ok((before - inner.grants.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> EntityRef {
        EntityRef::new("Article", 1)
    }

    fn user(id: i64) -> EntityRef {
        EntityRef::new("User", id)
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let created = store
            .create_grant(&NewGrant::new(article(), user(1), user(2)))
            .await
            .unwrap();

        assert_eq!(created.id, GrantId(1));
        let found = store.find_grant(&article(), &user(2)).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(store.find_grant(&article(), &user(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_uniqueness_ignores_grantor() {
        let store = MemoryStore::new();
        store
            .create_grant(&NewGrant::new(article(), user(1), user(2)))
            .await
            .unwrap();

        let err = store
            .create_grant(&NewGrant::new(article(), user(3), user(2)))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_delete_frees_key() {
        let store = MemoryStore::new();
        let grant = store
            .create_grant(&NewGrant::new(article(), user(1), user(2)))
            .await
            .unwrap();

        assert!(store.delete_grant(&grant).await.unwrap());
        assert!(!store.delete_grant(&grant).await.unwrap());

        // Same pair can be granted again once deleted.
        let again = store
            .create_grant(&NewGrant::new(article(), user(1), user(2)))
            .await
            .unwrap();
        assert_ne!(again.id, grant.id);
    }
}
