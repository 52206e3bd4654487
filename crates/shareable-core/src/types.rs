//! Identity types.
//!
//! Entities are compared by kind and id only. Two references to the same
//! row are equal no matter which in-memory value produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Polymorphic reference to an entity: its kind (type name) and id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub id: i64,
}

impl EntityRef {
    /// Create a new reference.
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Check that the reference can be persisted as a grant field.
    ///
    /// The kind must be non-blank and the id positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind.trim().is_empty() {
            return Err(ValidationError::BlankKind);
        }
        if self.id <= 0 {
            return Err(ValidationError::NonPositiveId {
                kind: self.kind.clone(),
                id: self.id,
            });
        }
        Ok(())
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({}#{})", self.kind, self.id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Store-assigned identifier of a grant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GrantId(pub i64);

impl GrantId {
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grant:{}", self.0)
    }
}

impl From<i64> for GrantId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_kind_and_id() {
        assert_eq!(EntityRef::new("User", 1), EntityRef::new("User", 1));
        assert_ne!(EntityRef::new("User", 1), EntityRef::new("Group", 1));
        assert_ne!(EntityRef::new("User", 1), EntityRef::new("User", 2));
    }

    #[test]
    fn test_display() {
        let r = EntityRef::new("Article", 42);
        assert_eq!(r.to_string(), "Article#42");
        assert_eq!(format!("{:?}", r), "EntityRef(Article#42)");
    }

    #[test]
    fn test_validate() {
        assert!(EntityRef::new("User", 1).validate().is_ok());
        assert_eq!(
            EntityRef::new("  ", 1).validate(),
            Err(ValidationError::BlankKind)
        );
        assert_eq!(
            EntityRef::new("User", 0).validate(),
            Err(ValidationError::NonPositiveId {
                kind: "User".into(),
                id: 0
            })
        );
    }
}
