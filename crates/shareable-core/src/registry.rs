//! Runtime role checks.
//!
//! Typed callers get role checks from the trait bounds. Callers that only
//! hold an [`EntityRef`] (a request handler decoding `User#3` from a path,
//! say) go through a [`RoleRegistry`], which turns a reference into a
//! role-bearing handle or fails with [`CoreError::TypeMismatch`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::role::{Entity, Shareable, ShareableOptions, Sharer};
use crate::types::EntityRef;

/// A sharing role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sharer,
    Shareable,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sharer => f.write_str("sharer"),
            Role::Shareable => f.write_str("shareable"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Roles {
    sharer: bool,
    shareable: bool,
}

/// Which entity kinds play which role.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    kinds: HashMap<String, Roles>,
}

impl RoleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `kind` as a sharer.
    pub fn sharer_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.entry(kind.into()).or_default().sharer = true;
        self
    }

    /// Declare `kind` as shareable.
    pub fn shareable_kind(mut self, kind: impl Into<String>) -> Self {
        self.kinds.entry(kind.into()).or_default().shareable = true;
        self
    }

    pub fn is_sharer(&self, kind: &str) -> bool {
        self.kinds.get(kind).is_some_and(|r| r.sharer)
    }

    pub fn is_shareable(&self, kind: &str) -> bool {
        self.kinds.get(kind).is_some_and(|r| r.shareable)
    }

    /// Check that `entity` may act as a sharer.
    pub fn sharer(&self, entity: EntityRef) -> Result<DynSharer> {
        if !self.is_sharer(&entity.kind) {
            return Err(CoreError::TypeMismatch {
                entity,
                role: Role::Sharer,
            });
        }
        Ok(DynSharer(entity))
    }

    /// Check that `entity` may be shared, attaching its resolved owner.
    pub fn shareable(&self, entity: EntityRef, owner: Option<EntityRef>) -> Result<DynShareable> {
        if !self.is_shareable(&entity.kind) {
            return Err(CoreError::TypeMismatch {
                entity,
                role: Role::Shareable,
            });
        }
        Ok(DynShareable { entity, owner })
    }
}

/// A reference checked to play the sharer role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynSharer(EntityRef);

impl DynSharer {
    pub fn entity(&self) -> &EntityRef {
        &self.0
    }
}

impl Entity for DynSharer {
    fn entity_ref(&self) -> EntityRef {
        self.0.clone()
    }
}

impl Sharer for DynSharer {}

/// A reference checked to play the shareable role, with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynShareable {
    entity: EntityRef,
    owner: Option<EntityRef>,
}

impl DynShareable {
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }
}

impl Entity for DynShareable {
    fn entity_ref(&self) -> EntityRef {
        self.entity.clone()
    }
}

impl Shareable for DynShareable {
    fn shareable_options() -> ShareableOptions<Self> {
        ShareableOptions::new().owner(|r: &Self| r.owner.clone())
    }
}
