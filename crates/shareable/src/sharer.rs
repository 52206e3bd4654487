//! Sharer capability: every permission decision lives here.
//!
//! Decision order for edit and read checks:
//! 1. Owner: the resource's owner always reads and edits, with no grant.
//! 2. Grant: a grant to this sharer on the resource allows reading, and
//!    editing when its edit flag is set.
//! 3. Otherwise denied.
//!
//! Mutations are gated on the acting sharer being able to edit the
//! resource, except [`leave`](SharerCapability::leave), which any grantee
//! may do. A refused mutation returns `Ok(false)`.

use shareable_core::{EntityRef, Grant, NewGrant, Shareable, Sharer};
use shareable_store::{GrantStore, StoreExt};
use tracing::{debug, info};

use crate::error::Result;
use crate::sharing::Sharing;

/// A sharer bound to a [`Sharing`] instance.
pub struct SharerCapability<'a, S: GrantStore, E: Sharer + ?Sized> {
    sharing: &'a Sharing<S>,
    entity: &'a E,
}

impl<'a, S: GrantStore, E: Sharer + ?Sized> SharerCapability<'a, S, E> {
    pub(crate) fn new(sharing: &'a Sharing<S>, entity: &'a E) -> Self {
        Self { sharing, entity }
    }

    /// Reference of the acting sharer.
    pub fn entity_ref(&self) -> EntityRef {
        self.entity.entity_ref()
    }

    fn is_owner_of<R: Shareable>(&self, resource: &R) -> bool {
        resource.shareable_owner() == Some(self.entity.entity_ref())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission Checks
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether this sharer may edit `resource`.
    pub async fn can_edit<R: Shareable>(&self, resource: &R) -> Result<bool> {
        if self.is_owner_of(resource) {
            return Ok(true);
        }
        let exists = self
            .sharing
            .store()
            .exists_grant(&resource.entity_ref(), &self.entity_ref(), Some(true))
            .await?;
        Ok(exists)
    }

    /// Whether this sharer may read `resource`.
    pub async fn can_read<R: Shareable>(&self, resource: &R) -> Result<bool> {
        if self.is_owner_of(resource) {
            return Ok(true);
        }
        let exists = self
            .sharing
            .store()
            .exists_grant(&resource.entity_ref(), &self.entity_ref(), None)
            .await?;
        Ok(exists)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Share `resource` with `to`, read-only unless `edit`.
    ///
    /// Returns `Ok(false)` if this sharer cannot edit the resource, or if
    /// `to` owns it. A second share to the same grantee fails with
    /// `ShareError::Conflict`; use [`allow_edit`](Self::allow_edit) to
    /// set-or-update.
    pub async fn share<R: Shareable, T: Sharer + ?Sized>(
        &self,
        resource: &R,
        to: &T,
        edit: bool,
    ) -> Result<bool> {
        self.insert(resource, to, edit, 0).await
    }

    /// Have `from` share `resource` with this sharer.
    pub async fn share_with_me<R: Shareable, F: Sharer + ?Sized>(
        &self,
        resource: &R,
        from: &F,
        edit: bool,
    ) -> Result<bool> {
        self.sharing.sharer(from).share(resource, self.entity, edit).await
    }

    /// Let `to` edit `resource`, creating a grant if needed.
    ///
    /// Idempotent: returns `Ok(true)` without writing if `to` can already
    /// edit.
    pub async fn allow_edit<R: Shareable, T: Sharer + ?Sized>(
        &self,
        resource: &R,
        to: &T,
    ) -> Result<bool> {
        if !self.can_edit(resource).await? {
            debug!(
                sharer = %self.entity_ref(),
                resource = %resource.entity_ref(),
                "allow_edit denied: sharer cannot edit"
            );
            return Ok(false);
        }
        if self.sharing.sharer(to).can_edit(resource).await? {
            return Ok(true);
        }

        let store = self.sharing.store();
        match store.find_grant(&resource.entity_ref(), &to.entity_ref()).await? {
            None => {
                let retries = self.sharing.config().conflict_retries;
                self.insert(resource, to, true, retries).await
            }
            Some(grant) => {
                let grant = store.update_grant_edit(&grant, true).await?;
                log_edit_change(&grant);
                Ok(true)
            }
        }
    }

    /// Downgrade `to` to read-only on `resource`.
    ///
    /// Returns `Ok(true)` when there is no grant to downgrade.
    pub async fn prevent_edit<R: Shareable, T: Sharer + ?Sized>(
        &self,
        resource: &R,
        to: &T,
    ) -> Result<bool> {
        if !self.can_edit(resource).await? {
            debug!(
                sharer = %self.entity_ref(),
                resource = %resource.entity_ref(),
                "prevent_edit denied: sharer cannot edit"
            );
            return Ok(false);
        }

        let store = self.sharing.store();
        let Some(grant) = store.find_grant(&resource.entity_ref(), &to.entity_ref()).await? else {
            debug!(grantee = %to.entity_ref(), "prevent_edit: nothing to revoke");
            return Ok(true);
        };
        if grant.edit {
            let grant = store.update_grant_edit(&grant, false).await?;
            log_edit_change(&grant);
        }
        Ok(true)
    }

    /// Remove `grantee`'s access to `resource`.
    ///
    /// Requires this sharer to be able to edit. The owner can never be
    /// thrown out.
    pub async fn throw_out<R: Shareable, T: Sharer + ?Sized>(
        &self,
        resource: &R,
        grantee: &T,
    ) -> Result<bool> {
        self.throw_out_with(resource, grantee, true).await
    }

    /// [`throw_out`](Self::throw_out) with the edit-permission check made
    /// optional.
    pub async fn throw_out_with<R: Shareable, T: Sharer + ?Sized>(
        &self,
        resource: &R,
        grantee: &T,
        require_edit_permission: bool,
    ) -> Result<bool> {
        let target = resource.entity_ref();
        let grantee = grantee.entity_ref();

        if require_edit_permission && !self.can_edit(resource).await? {
            debug!(sharer = %self.entity_ref(), resource = %target, "throw_out denied: sharer cannot edit");
            return Ok(false);
        }
        if resource.shareable_owner().as_ref() == Some(&grantee) {
            debug!(resource = %target, owner = %grantee, "throw_out denied: owner cannot be removed");
            return Ok(false);
        }

        let store = self.sharing.store();
        match store.find_grant(&target, &grantee).await? {
            None => Ok(true),
            Some(grant) => {
                let removed = store.delete_grant(&grant).await?;
                if removed {
                    info!(grant = %grant.id, resource = %target, grantee = %grantee, "grant removed");
                }
                Ok(removed)
            }
        }
    }

    /// Drop this sharer's own access to `resource`.
    ///
    /// Needs no edit permission. Fails for the owner.
    pub async fn leave<R: Shareable>(&self, resource: &R) -> Result<bool> {
        self.throw_out_with(resource, self.entity, false).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Collections
    // ─────────────────────────────────────────────────────────────────────────

    /// Grants this sharer has created.
    pub async fn shared_resources(&self) -> Result<Vec<Grant>> {
        Ok(self.sharing.store().grants_from(&self.entity_ref()).await?)
    }

    /// Grants this sharer has received.
    pub async fn shared_with_me(&self) -> Result<Vec<Grant>> {
        Ok(self.sharing.store().grants_to(&self.entity_ref()).await?)
    }

    /// Permission-gated grant creation shared by `share` and `allow_edit`.
    async fn insert<R: Shareable, T: Sharer + ?Sized>(
        &self,
        resource: &R,
        to: &T,
        edit: bool,
        retries: u32,
    ) -> Result<bool> {
        let target = resource.entity_ref();
        let grantee = to.entity_ref();

        if !self.can_edit(resource).await? {
            debug!(sharer = %self.entity_ref(), resource = %target, "share denied: sharer cannot edit");
            return Ok(false);
        }
        if resource.shareable_owner().as_ref() == Some(&grantee) {
            debug!(resource = %target, owner = %grantee, "share skipped: grantee owns the resource");
            return Ok(false);
        }

        let new = NewGrant::new(target, self.entity_ref(), grantee).with_edit(edit);
        let grant = self
            .sharing
            .store()
            .create_or_update_grant(&new, retries)
            .await?;

        info!(
            grant = %grant.id,
            resource = %grant.resource,
            grantor = %grant.grantor,
            grantee = %grant.grantee,
            edit = grant.edit,
            "resource shared"
        );
        Ok(true)
    }
}

fn log_edit_change(grant: &Grant) {
    info!(
        grant = %grant.id,
        resource = %grant.resource,
        grantee = %grant.grantee,
        edit = grant.edit,
        "grant edit flag changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SharingConfig;
    use crate::error::ShareError;
    use shareable_core::{Entity, ShareableOptions};
    use shareable_store::MemoryStore;

    struct User(i64);

    impl Entity for User {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("User", self.0)
        }
    }

    impl Sharer for User {}

    struct Doc {
        id: i64,
        owner: Option<i64>,
    }

    impl Entity for Doc {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Doc", self.id)
        }
    }

    impl Shareable for Doc {
        fn shareable_options() -> ShareableOptions<Self> {
            ShareableOptions::new().owner(|d: &Self| d.owner.map(|id| EntityRef::new("User", id)))
        }
    }

    fn setup() -> (Sharing<MemoryStore>, User, User, User, Doc) {
        let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
        (
            sharing,
            User(1),
            User(2),
            User(3),
            Doc {
                id: 1,
                owner: Some(1),
            },
        )
    }

    #[tokio::test]
    async fn test_owner_has_full_access_without_grant() {
        let (sharing, owner, _, _, doc) = setup();

        assert!(sharing.sharer(&owner).can_edit(&doc).await.unwrap());
        assert!(sharing.sharer(&owner).can_read(&doc).await.unwrap());
        assert!(sharing.store().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_share_read_only() {
        let (sharing, owner, reader, _, doc) = setup();

        assert!(sharing.sharer(&owner).share(&doc, &reader, false).await.unwrap());
        assert!(sharing.sharer(&reader).can_read(&doc).await.unwrap());
        assert!(!sharing.sharer(&reader).can_edit(&doc).await.unwrap());
    }

    #[tokio::test]
    async fn test_share_twice_is_conflict() {
        let (sharing, owner, reader, _, doc) = setup();

        sharing.sharer(&owner).share(&doc, &reader, false).await.unwrap();
        let err = sharing
            .sharer(&owner)
            .share(&doc, &reader, true)
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_share_with_owner_writes_nothing() {
        let (sharing, owner, editor, _, doc) = setup();

        sharing.sharer(&owner).allow_edit(&doc, &editor).await.unwrap();
        assert!(!sharing.sharer(&editor).share(&doc, &owner, false).await.unwrap());
        assert_eq!(sharing.store().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_share_with_me() {
        let (sharing, owner, reader, _, doc) = setup();

        assert!(sharing
            .sharer(&reader)
            .share_with_me(&doc, &owner, false)
            .await
            .unwrap());

        let received = sharing.sharer(&reader).shared_with_me().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].grantor, owner.entity_ref());

        let created = sharing.sharer(&owner).shared_resources().await.unwrap();
        assert_eq!(created, received);
    }

    #[tokio::test]
    async fn test_allow_edit_upgrades_existing_grant() {
        let (sharing, owner, reader, _, doc) = setup();

        sharing.sharer(&owner).share(&doc, &reader, false).await.unwrap();
        assert!(sharing.sharer(&owner).allow_edit(&doc, &reader).await.unwrap());
        assert!(sharing.sharer(&reader).can_edit(&doc).await.unwrap());
        assert_eq!(sharing.store().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_editor_can_extend_access() {
        let (sharing, owner, editor, other, doc) = setup();

        sharing.sharer(&owner).allow_edit(&doc, &editor).await.unwrap();
        assert!(sharing.sharer(&editor).share(&doc, &other, false).await.unwrap());

        let grant = sharing
            .store()
            .find_grant(&doc.entity_ref(), &other.entity_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(grant.grantor, editor.entity_ref());
    }

    #[tokio::test]
    async fn test_prevent_edit_without_grant_is_vacuous() {
        let (sharing, owner, _, stranger, doc) = setup();

        assert!(sharing.sharer(&owner).prevent_edit(&doc, &stranger).await.unwrap());
        assert!(sharing.store().is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_reader_cannot_throw_out() {
        let (sharing, owner, reader, other, doc) = setup();

        sharing.sharer(&owner).share(&doc, &reader, false).await.unwrap();
        sharing.sharer(&owner).share(&doc, &other, false).await.unwrap();

        assert!(!sharing.sharer(&reader).throw_out(&doc, &other).await.unwrap());
        assert!(sharing.sharer(&other).can_read(&doc).await.unwrap());

        // Skipping the edit check lets anyone remove a grant, owner excepted.
        assert!(sharing
            .sharer(&reader)
            .throw_out_with(&doc, &other, false)
            .await
            .unwrap());
        assert!(!sharing.sharer(&other).can_read(&doc).await.unwrap());
        assert!(!sharing
            .sharer(&reader)
            .throw_out_with(&doc, &owner, false)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unowned_resource_is_closed() {
        let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
        let user = User(1);
        let doc = Doc { id: 9, owner: None };

        assert!(!sharing.sharer(&user).can_read(&doc).await.unwrap());
        assert!(!sharing.sharer(&user).share(&doc, &User(2), false).await.unwrap());
        assert!(sharing.sharer(&user).leave(&doc).await.unwrap());
    }
}
