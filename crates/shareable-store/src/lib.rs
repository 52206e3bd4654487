//! # Shareable Store
//!
//! Storage abstraction for the sharing ledger. Provides a trait-based
//! interface for grant persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts grant storage behind the [`GrantStore`] trait,
//! allowing the capability layer to be storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`GrantStore`] - The async trait for all storage operations
//! - [`StoreExt`] - Create-or-update with bounded conflict retries
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shareable_core::{EntityRef, NewGrant};
//! use shareable_store::{GrantStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("grants.db").unwrap();
//!
//!     let article = EntityRef::new("Article", 1);
//!     let angel = EntityRef::new("User", 1);
//!     let clara = EntityRef::new("User", 2);
//!
//!     let grant = store
//!         .create_grant(&NewGrant::new(article.clone(), angel, clara.clone()))
//!         .await
//!         .unwrap();
//!     assert!(!grant.edit);
//!     assert!(store.exists_grant(&article, &clara, None).await.unwrap());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **One grant per (resource, grantee)**: a second create returns `Conflict`
//! - **Grantor is attribution only**: it takes no part in uniqueness
//! - **No caching**: every call reads or writes the backing store

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{GrantStore, StoreExt};
