//! The sharing ledger record.
//!
//! A grant lets one sharer (the grantee) read a resource, and optionally
//! edit it. It is attributed to the sharer that created it (the grantor).
//! At most one grant exists per (resource, grantee) pair, regardless of
//! grantor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{EntityRef, GrantId};

/// A persisted grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: GrantId,

    /// The shared resource.
    pub resource: EntityRef,

    /// Who created the grant ("shared_from").
    pub grantor: EntityRef,

    /// Who receives access ("shared_to").
    pub grantee: EntityRef,

    /// Whether the grantee may edit.
    pub edit: bool,
}

impl Grant {
    /// The uniqueness key of this grant.
    pub fn key(&self) -> (&EntityRef, &EntityRef) {
        (&self.resource, &self.grantee)
    }

    pub fn is_read_only(&self) -> bool {
        !self.edit
    }
}

/// A grant that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGrant {
    pub resource: EntityRef,
    pub grantor: EntityRef,
    pub grantee: EntityRef,
    #[serde(default)]
    pub edit: bool,
}

impl NewGrant {
    /// A read-only grant.
    pub fn new(resource: EntityRef, grantor: EntityRef, grantee: EntityRef) -> Self {
        Self {
            resource,
            grantor,
            grantee,
            edit: false,
        }
    }

    /// Set the edit flag.
    pub fn with_edit(mut self, edit: bool) -> Self {
        self.edit = edit;
        self
    }

    /// Validate all three references.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.resource
            .validate()
            .map_err(|e| e.in_field("resource"))?;
        self.grantor
            .validate()
            .map_err(|e| e.in_field("shared_from"))?;
        self.grantee
            .validate()
            .map_err(|e| e.in_field("shared_to"))?;
        Ok(())
    }

    /// Attach a store-assigned id.
    pub fn into_grant(self, id: GrantId) -> Grant {
        Grant {
            id,
            resource: self.resource,
            grantor: self.grantor,
            grantee: self.grantee,
            edit: self.edit,
        }
    }
}
