//! Error types for the store module.

use shareable_core::{EntityRef, GrantId, ValidationError};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A grant field failed validation.
    #[error("invalid grant: {0}")]
    Validation(#[from] ValidationError),

    /// A grant for this (resource, grantee) pair already exists.
    #[error("{resource} is already shared with {grantee}")]
    Conflict {
        resource: EntityRef,
        grantee: EntityRef,
    },

    /// Grant not found.
    #[error("grant not found: {0}")]
    NotFound(GrantId),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// Blocking task failed to complete.
    #[error("background task failed: {0}")]
    Task(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether retrying against fresh state may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
