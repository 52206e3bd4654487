//! Shareable capability: the resource-side view.
//!
//! Every decision is delegated to [`SharerCapability`] with the arguments
//! swapped, so both views always agree.

use shareable_core::{EntityRef, Grant, Shareable, Sharer};
use shareable_store::GrantStore;
use tracing::info;

use crate::error::Result;
use crate::sharing::Sharing;

/// A resource bound to a [`Sharing`] instance.
pub struct ShareableCapability<'a, S: GrantStore, R: Shareable> {
    sharing: &'a Sharing<S>,
    resource: &'a R,
}

impl<'a, S: GrantStore, R: Shareable> ShareableCapability<'a, S, R> {
    pub(crate) fn new(sharing: &'a Sharing<S>, resource: &'a R) -> Self {
        Self { sharing, resource }
    }

    /// The resource's owner, if the type declares one.
    pub fn owner(&self) -> Option<EntityRef> {
        self.resource.shareable_owner()
    }

    /// `from` shares this resource with `to`.
    pub async fn share_it<F, T>(&self, from: &F, to: &T, edit: bool) -> Result<bool>
    where
        F: Sharer + ?Sized,
        T: Sharer + ?Sized,
    {
        self.sharing.sharer(from).share(self.resource, to, edit).await
    }

    /// `by` removes `grantee` from this resource.
    pub async fn throw_out<B, T>(&self, by: &B, grantee: &T) -> Result<bool>
    where
        B: Sharer + ?Sized,
        T: Sharer + ?Sized,
    {
        self.sharing.sharer(by).throw_out(self.resource, grantee).await
    }

    /// `grantee` gives up its own access.
    pub async fn leave_by<T: Sharer + ?Sized>(&self, grantee: &T) -> Result<bool> {
        self.sharing.sharer(grantee).leave(self.resource).await
    }

    pub async fn editable_by<T: Sharer + ?Sized>(&self, who: &T) -> Result<bool> {
        self.sharing.sharer(who).can_edit(self.resource).await
    }

    pub async fn readable_by<T: Sharer + ?Sized>(&self, who: &T) -> Result<bool> {
        self.sharing.sharer(who).can_read(self.resource).await
    }

    /// `by` lets `to` edit this resource.
    pub async fn allow_edit<B, T>(&self, by: &B, to: &T) -> Result<bool>
    where
        B: Sharer + ?Sized,
        T: Sharer + ?Sized,
    {
        self.sharing.sharer(by).allow_edit(self.resource, to).await
    }

    /// `by` downgrades `to` to read-only.
    pub async fn prevent_edit<B, T>(&self, by: &B, to: &T) -> Result<bool>
    where
        B: Sharer + ?Sized,
        T: Sharer + ?Sized,
    {
        self.sharing.sharer(by).prevent_edit(self.resource, to).await
    }

    /// All grants on this resource.
    pub async fn shared_with(&self) -> Result<Vec<Grant>> {
        let resource = self.resource.entity_ref();
        Ok(self.sharing.store().grants_for_resource(&resource).await?)
    }

    /// Delete every grant on this resource.
    ///
    /// Call when the resource itself is destroyed. Not permission-gated.
    pub async fn purge(&self) -> Result<u64> {
        let resource = self.resource.entity_ref();
        let removed = self
            .sharing
            .store()
            .delete_grants_for_resource(&resource)
            .await?;
        info!(resource = %resource, removed, "grants purged");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SharingConfig;
    use shareable_core::{Entity, ShareableOptions};
    use shareable_store::MemoryStore;

    struct User(i64);

    impl Entity for User {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("User", self.0)
        }
    }

    impl Sharer for User {}

    struct Folder {
        id: i64,
        owner: i64,
    }

    impl Entity for Folder {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Folder", self.id)
        }
    }

    impl Shareable for Folder {
        fn shareable_options() -> ShareableOptions<Self> {
            ShareableOptions::new().owner(|f: &Self| Some(EntityRef::new("User", f.owner)))
        }
    }

    #[tokio::test]
    async fn test_resource_view_delegates() {
        let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
        let (owner, guest) = (User(1), User(2));
        let folder = Folder { id: 5, owner: 1 };
        let view = sharing.shareable(&folder);

        assert_eq!(view.owner(), Some(owner.entity_ref()));
        assert!(view.share_it(&owner, &guest, false).await.unwrap());
        assert!(view.readable_by(&guest).await.unwrap());
        assert!(!view.editable_by(&guest).await.unwrap());

        assert!(view.allow_edit(&owner, &guest).await.unwrap());
        assert!(view.editable_by(&guest).await.unwrap());
        assert!(view.prevent_edit(&owner, &guest).await.unwrap());
        assert!(!view.editable_by(&guest).await.unwrap());

        assert!(view.leave_by(&guest).await.unwrap());
        assert!(!view.readable_by(&guest).await.unwrap());
        assert!(!view.leave_by(&owner).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_removes_only_this_resource() {
        let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
        let (owner, a, b) = (User(1), User(2), User(3));
        let first = Folder { id: 1, owner: 1 };
        let second = Folder { id: 2, owner: 1 };

        sharing.shareable(&first).share_it(&owner, &a, false).await.unwrap();
        sharing.shareable(&first).share_it(&owner, &b, true).await.unwrap();
        sharing.shareable(&second).share_it(&owner, &a, false).await.unwrap();

        assert_eq!(sharing.shareable(&first).shared_with().await.unwrap().len(), 2);
        assert_eq!(sharing.shareable(&first).purge().await.unwrap(), 2);
        assert!(sharing.shareable(&first).shared_with().await.unwrap().is_empty());
        assert_eq!(sharing.shareable(&second).shared_with().await.unwrap().len(), 1);
    }
}
