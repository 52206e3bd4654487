//! GrantStore trait: the abstract interface for the sharing ledger.
//!
//! The capability layer only needs to look grants up, store them, and
//! delete them by composite key. Implementations include SQLite (primary)
//! and in-memory (for tests).

use async_trait::async_trait;
use shareable_core::{EntityRef, Grant, NewGrant};
use tracing::warn;

use crate::error::{Result, StoreError};

/// The GrantStore trait: async interface for grant persistence.
///
/// # Design Notes
///
/// - **Uniqueness**: at most one grant per (resource, grantee). The check and
///   the insert must be atomic; a losing writer gets [`StoreError::Conflict`].
/// - **Validation**: `create_grant` validates all three references before
///   writing.
/// - **Durability**: every mutation is a write to the backing store. There
///   is no cache in front of it.
#[async_trait]
pub trait GrantStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Single Grant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Find the unique grant for (resource, grantee).
    async fn find_grant(&self, resource: &EntityRef, grantee: &EntityRef)
        -> Result<Option<Grant>>;

    /// Create a grant.
    ///
    /// # Errors
    /// - `Validation` if any reference is invalid.
    /// - `Conflict` if a grant for (resource, grantee) already exists.
    async fn create_grant(&self, grant: &NewGrant) -> Result<Grant>;

    /// Set the edit flag of an existing grant in place.
    ///
    /// Returns `NotFound` if the grant was deleted in the meantime.
    async fn update_grant_edit(&self, grant: &Grant, edit: bool) -> Result<Grant>;

    /// Delete a grant. Returns `false` if it was already gone.
    async fn delete_grant(&self, grant: &Grant) -> Result<bool>;

    /// Whether a grant exists for (resource, grantee).
    ///
    /// With `edit: Some(flag)` only grants with that edit flag count.
    async fn exists_grant(
        &self,
        resource: &EntityRef,
        grantee: &EntityRef,
        edit: Option<bool>,
    ) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Collections
    // ─────────────────────────────────────────────────────────────────────────

    /// Grants whose resource is `resource` ("shared_with").
    async fn grants_for_resource(&self, resource: &EntityRef) -> Result<Vec<Grant>>;

    /// Grants created by `grantor` ("shared_resources").
    async fn grants_from(&self, grantor: &EntityRef) -> Result<Vec<Grant>>;

    /// Grants received by `grantee` ("shared_with_me").
    async fn grants_to(&self, grantee: &EntityRef) -> Result<Vec<Grant>>;

    /// Delete every grant on `resource`. Returns how many were removed.
    async fn delete_grants_for_resource(&self, resource: &EntityRef) -> Result<u64>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: GrantStore {
    /// Create a grant, falling back to an edit-flag update if another
    /// writer created the same (resource, grantee) pair first.
    ///
    /// `retries` bounds how many conflicts are absorbed before the
    /// `Conflict` error is returned to the caller.
    fn create_or_update_grant(
        &self,
        grant: &NewGrant,
        retries: u32,
    ) -> impl std::future::Future<Output = Result<Grant>> + Send;
}

impl<S: GrantStore + ?Sized> StoreExt for S {
    async fn create_or_update_grant(&self, grant: &NewGrant, retries: u32) -> Result<Grant> {
        let mut attempt = 0;
        loop {
            match self.create_grant(grant).await {
                Ok(created) => return Ok(created),
                Err(err) if err.is_conflict() && attempt < retries => {
                    attempt += 1;
                    warn!(
                        resource = %grant.resource,
                        grantee = %grant.grantee,
                        attempt,
                        "grant creation lost a race: {}",
                        err
                    );
                }
                Err(err) => return Err(err),
            }

            // The winner may have been deleted again before we look.
            if let Some(existing) = self.find_grant(&grant.resource, &grant.grantee).await? {
                return match self.update_grant_edit(&existing, grant.edit).await {
                    Err(StoreError::NotFound(_)) if attempt < retries => continue,
                    other => other,
                };
            }
        }
    }
}
