//! # Shareable
//!
//! Share models with other models. A resource's owner can read and edit it;
//! everyone else needs a grant, which is either read-only or read/write.
//!
//! ## Overview
//!
//! - **Grant**: one row per (resource, grantee) recording who shared, and
//!   whether the grantee may edit.
//! - **Sharer**: an entity that can receive and hand out grants
//!   ([`SharerCapability`]). All permission rules live here.
//! - **Shareable**: an entity that can be shared, optionally with an owner
//!   ([`ShareableCapability`]). Its operations delegate to the sharer side.
//!
//! ## Rules
//!
//! - The owner always has full access and never holds a grant.
//! - Only someone who can edit a resource may share it, change edit rights,
//!   or throw others out.
//! - Any grantee may leave. The owner cannot leave or be thrown out.
//! - A refused operation returns `Ok(false)`; errors are faults.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shareable::{Sharing, SharingConfig};
//! use shareable::core::{Entity, EntityRef, Shareable, ShareableOptions, Sharer};
//! use shareable::store::SqliteStore;
//!
//! struct User { id: i64 }
//!
//! impl Entity for User {
//!     fn entity_ref(&self) -> EntityRef { EntityRef::new("User", self.id) }
//! }
//! impl Sharer for User {}
//!
//! struct Article { id: i64, user_id: i64 }
//!
//! impl Entity for Article {
//!     fn entity_ref(&self) -> EntityRef { EntityRef::new("Article", self.id) }
//! }
//! impl Shareable for Article {
//!     fn shareable_options() -> ShareableOptions<Self> {
//!         ShareableOptions::new().owner(|a: &Self| Some(EntityRef::new("User", a.user_id)))
//!     }
//! }
//!
//! async fn example() -> shareable::Result<()> {
//!     let store = SqliteStore::open("shares.db")?;
//!     let sharing = Sharing::new(store, SharingConfig::default());
//!
//!     let angel = User { id: 1 };
//!     let clara = User { id: 2 };
//!     let article = Article { id: 1, user_id: 1 };
//!
//!     sharing.sharer(&angel).allow_edit(&article, &clara).await?;
//!     assert!(sharing.shareable(&article).editable_by(&clara).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `shareable::core` - Entity references, grants and role traits
//! - `shareable::store` - Grant storage and SQLite

pub mod config;
pub mod error;
pub mod shareable;
pub mod sharer;
pub mod sharing;

// Re-export component crates
pub use shareable_core as core;
pub use shareable_store as store;

pub use config::SharingConfig;
pub use error::{Result, ShareError};
pub use shareable::ShareableCapability;
pub use sharer::SharerCapability;
pub use sharing::Sharing;

// Re-export commonly used core types
pub use shareable_core::{Entity, EntityRef, Grant, GrantId, Shareable, ShareableOptions, Sharer};
