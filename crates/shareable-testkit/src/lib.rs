//! # Shareable Testkit
//!
//! Testing utilities for shareable.
//!
//! ## Overview
//!
//! - **Fixtures**: `User`, `Group` and `Article` entities and a
//!   [`TestFixture`] with Angel, Clara and Jose
//! - **Generators**: Proptest strategies for references, grants and
//!   access levels
//!
//! ## Test Fixtures
//!
//! ```rust
//! use shareable_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! assert_eq!(fixture.article.user_id, fixture.angel.id);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use shareable_testkit::generators::AccessLevel;
//!
//! proptest! {
//!     #[test]
//!     fn owner_can_always_edit(level: AccessLevel) {
//!         prop_assert!(level != AccessLevel::Owner || level.can_edit());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{access_of, Article, Group, TestFixture, User};
pub use generators::AccessLevel;
