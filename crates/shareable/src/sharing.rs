//! Sharing: the entry point tying a grant store to the two capabilities.

use std::sync::Arc;

use shareable_core::{Shareable, Sharer};
use shareable_store::GrantStore;

use crate::config::SharingConfig;
use crate::shareable::ShareableCapability;
use crate::sharer::SharerCapability;

/// Owns the grant store and hands out capability views.
///
/// ```rust,no_run
/// # use shareable::{Sharing, SharingConfig};
/// # use shareable::store::MemoryStore;
/// # use shareable::core::{Entity, EntityRef, Shareable, ShareableOptions, Sharer};
/// # struct User(i64);
/// # impl Entity for User { fn entity_ref(&self) -> EntityRef { EntityRef::new("User", self.0) } }
/// # impl Sharer for User {}
/// # struct Article { id: i64, author: i64 }
/// # impl Entity for Article { fn entity_ref(&self) -> EntityRef { EntityRef::new("Article", self.id) } }
/// # impl Shareable for Article {
/// #     fn shareable_options() -> ShareableOptions<Self> {
/// #         ShareableOptions::new().owner(|a: &Self| Some(EntityRef::new("User", a.author)))
/// #     }
/// # }
/// # async fn example() -> shareable::Result<()> {
/// let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
/// let (angel, clara) = (User(1), User(2));
/// let article = Article { id: 1, author: 1 };
///
/// assert!(sharing.sharer(&angel).share(&article, &clara, false).await?);
/// assert!(sharing.shareable(&article).readable_by(&clara).await?);
/// # Ok(())
/// # }
/// ```
pub struct Sharing<S: GrantStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: SharingConfig,
}

impl<S: GrantStore> Sharing<S> {
    /// Create a new sharing instance.
    pub fn new(store: S, config: SharingConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Create a sharing instance over a store shared with other code.
    pub fn from_shared(store: Arc<S>, config: SharingConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SharingConfig {
        &self.config
    }

    /// Operations from the perspective of a sharer.
    pub fn sharer<'a, E: Sharer + ?Sized>(&'a self, entity: &'a E) -> SharerCapability<'a, S, E> {
        SharerCapability::new(self, entity)
    }

    /// Operations from the perspective of a resource.
    pub fn shareable<'a, R: Shareable>(&'a self, resource: &'a R) -> ShareableCapability<'a, S, R> {
        ShareableCapability::new(self, resource)
    }
}

impl<S: GrantStore> Clone for Sharing<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}
