//! # Shareable Core
//!
//! Pure primitives for shareable models: entity references, grants, and the
//! two sharing roles.
//!
//! This crate contains no I/O and no storage. It describes *who* can share
//! *what*; persistence lives in `shareable-store` and the permission
//! decisions live in `shareable`.
//!
//! ## Key Types
//!
//! - [`EntityRef`] - Polymorphic identity of any entity (kind + id)
//! - [`Grant`] - One row of the sharing ledger
//! - [`Sharer`] - Role for entities that grant and receive access
//! - [`Shareable`] - Role for entities that can be shared
//! - [`RoleRegistry`] - Runtime role checks for callers holding bare references
//!
//! ## Roles
//!
//! Any type can opt into either role, or both:
//!
//! ```rust
//! use shareable_core::{Entity, EntityRef, Shareable, ShareableOptions, Sharer};
//!
//! struct User { id: i64 }
//! struct Article { id: i64, author_id: i64 }
//!
//! impl Entity for User {
//!     fn entity_ref(&self) -> EntityRef { EntityRef::new("User", self.id) }
//! }
//! impl Sharer for User {}
//!
//! impl Entity for Article {
//!     fn entity_ref(&self) -> EntityRef { EntityRef::new("Article", self.id) }
//! }
//! impl Shareable for Article {
//!     fn shareable_options() -> ShareableOptions<Self> {
//!         ShareableOptions::new().owner(|a: &Self| Some(EntityRef::new("User", a.author_id)))
//!     }
//! }
//!
//! let article = Article { id: 1, author_id: 7 };
//! assert_eq!(article.shareable_owner(), Some(User { id: 7 }.entity_ref()));
//! ```

pub mod error;
pub mod grant;
pub mod registry;
pub mod role;
pub mod types;

pub use error::{CoreError, Result, ValidationError};
pub use grant::{Grant, NewGrant};
pub use registry::{DynShareable, DynSharer, Role, RoleRegistry};
pub use role::{Entity, Shareable, ShareableOptions, Sharer};
pub use types::{EntityRef, GrantId};
