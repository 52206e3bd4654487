//! Error types for sharing operations.
//!
//! Permission denials are not errors: capability methods return `Ok(false)`
//! when policy refuses an operation. The variants here are faults.

use shareable_core::{CoreError, EntityRef, Role, ValidationError};
use shareable_store::StoreError;
use thiserror::Error;

/// Errors that can occur during sharing operations.
#[derive(Debug, Error)]
pub enum ShareError {
    /// An entity was used in a role its kind does not play.
    #[error("type mismatch: {entity} does not support the {role} role")]
    TypeMismatch { entity: EntityRef, role: Role },

    /// A grant reference failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Another grant for (resource, grantee) already exists.
    ///
    /// Retryable: re-check state and take the update path.
    #[error("{resource} is already shared with {grantee}")]
    Conflict {
        resource: EntityRef,
        grantee: EntityRef,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl ShareError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShareError::Conflict { .. })
    }
}

impl From<StoreError> for ShareError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => ShareError::Validation(v),
            StoreError::Conflict { resource, grantee } => ShareError::Conflict { resource, grantee },
            other => ShareError::Store(other),
        }
    }
}

impl From<CoreError> for ShareError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::TypeMismatch { entity, role } => ShareError::TypeMismatch { entity, role },
            CoreError::Validation(v) => ShareError::Validation(v),
        }
    }
}

/// Result type for sharing operations.
pub type Result<T> = std::result::Result<T, ShareError>;
