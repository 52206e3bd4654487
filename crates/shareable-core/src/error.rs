//! Error types for shareable core.

use thiserror::Error;

use crate::registry::Role;
use crate::types::EntityRef;

/// Core errors raised before any storage is touched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The entity's kind is not registered for the requested role.
    #[error("{entity} does not support the {role} role")]
    TypeMismatch { entity: EntityRef, role: Role },

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// An entity reference is unusable as a grant field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entity kind must not be blank")]
    BlankKind,

    #[error("entity id must be positive, got {kind}#{id}")]
    NonPositiveId { kind: String, id: i64 },

    /// A named grant field failed validation.
    #[error("{field} is invalid: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Attach the name of the grant field that failed.
    pub fn in_field(self, field: &'static str) -> Self {
        ValidationError::Field {
            field,
            source: Box::new(self),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
