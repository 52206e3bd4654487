//! Sharing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`Sharing`](crate::Sharing).
///
/// Deserializable with every field optional, so it can sit inside a host
/// application's config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharingConfig {
    /// How many uniqueness conflicts `allow_edit` absorbs by switching to the
    /// update path before reporting `Conflict`.
    pub conflict_retries: u32,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            conflict_retries: 1,
        }
    }
}
