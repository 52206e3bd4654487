//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a few users, a group, and an
//! article owned by Angel.

use shareable::{Result, Sharing, SharingConfig};
use shareable_core::{Entity, EntityRef, Shareable, ShareableOptions, Sharer};
use shareable_store::{GrantStore, MemoryStore, SqliteStore};

use crate::generators::AccessLevel;

pub const ANGEL: i64 = 1;
pub const CLARA: i64 = 2;
pub const JOSE: i64 = 3;

/// A user. Plays the sharer role only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
}

impl User {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

impl Entity for User {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("User", self.id)
    }
}

impl Sharer for User {}

/// A group of users. Plays both roles: it can be shared with, and it can
/// itself be shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub admin_id: Option<i64>,
}

impl Entity for Group {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("Group", self.id)
    }
}

impl Sharer for Group {}

impl Shareable for Group {
    fn shareable_options() -> ShareableOptions<Self> {
        ShareableOptions::new().owner(|g: &Self| g.admin_id.map(|id| EntityRef::new("User", id)))
    }
}

/// An article, owned by the user who wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub user_id: i64,
}

impl Article {
    pub fn new(id: i64, author: &User) -> Self {
        Self {
            id,
            user_id: author.id,
        }
    }
}

impl Entity for Article {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new("Article", self.id)
    }
}

impl Shareable for Article {
    fn shareable_options() -> ShareableOptions<Self> {
        ShareableOptions::new().owner(|a: &Self| Some(EntityRef::new("User", a.user_id)))
    }
}

/// A comment. Plays no role, so it only exists as a bare reference.
pub fn comment(id: i64) -> EntityRef {
    EntityRef::new("Comment", id)
}

/// A test fixture with three users, a group and an article.
pub struct TestFixture<S: GrantStore = MemoryStore> {
    pub sharing: Sharing<S>,
    pub angel: User,
    pub clara: User,
    pub jose: User,
    /// Administered by Clara.
    pub group: Group,
    /// Written by Angel.
    pub article: Article,
}

impl TestFixture<MemoryStore> {
    /// Create a new fixture backed by an in-memory store.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for TestFixture<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture<SqliteStore> {
    /// Create a new fixture backed by an in-memory SQLite database.
    pub fn sqlite() -> shareable_store::Result<Self> {
        Ok(Self::with_store(SqliteStore::open_memory()?))
    }
}

impl<S: GrantStore> TestFixture<S> {
    pub fn with_store(store: S) -> Self {
        Self::with_config(store, SharingConfig::default())
    }

    pub fn with_config(store: S, config: SharingConfig) -> Self {
        let angel = User::new(ANGEL);
        let article = Article::new(1, &angel);
        Self {
            sharing: Sharing::new(store, config),
            angel,
            clara: User::new(CLARA),
            jose: User::new(JOSE),
            group: Group {
                id: 1,
                admin_id: Some(CLARA),
            },
            article,
        }
    }

    /// Number of grants stored for the fixture article.
    pub async fn article_grants(&self) -> Result<usize> {
        Ok(self.sharing.shareable(&self.article).shared_with().await?.len())
    }

    /// Angel gives Jose read-only access to the article.
    pub async fn jose_reads_article(&self) -> Result<bool> {
        self.sharing
            .sharer(&self.angel)
            .share(&self.article, &self.jose, false)
            .await
    }

    /// Build an article in which Clara and Jose hold the given levels.
    ///
    /// Whoever is `Owner` writes the article; if neither is, Angel does.
    /// Grants are issued by the owner. Both users holding `Owner` is not a
    /// reachable state, so Jose is demoted to `Edit` in that case.
    pub async fn article_with(
        &self,
        id: i64,
        clara: AccessLevel,
        jose: AccessLevel,
    ) -> Result<Article> {
        let jose = if clara == AccessLevel::Owner && jose == AccessLevel::Owner {
            AccessLevel::Edit
        } else {
            jose
        };
        let owner = if clara == AccessLevel::Owner {
            &self.clara
        } else if jose == AccessLevel::Owner {
            &self.jose
        } else {
            &self.angel
        };

        let article = Article::new(id, owner);
        let sharer = self.sharing.sharer(owner);
        for (user, level) in [(&self.clara, clara), (&self.jose, jose)] {
            if level.has_grant() {
                sharer.share(&article, user, level.can_edit()).await?;
            }
        }
        Ok(article)
    }
}

/// Read back a user's effective access to a resource.
pub async fn access_of<S, R>(sharing: &Sharing<S>, resource: &R, user: &User) -> Result<AccessLevel>
where
    S: GrantStore,
    R: Shareable,
{
    if resource.shareable_owner() == Some(user.entity_ref()) {
        return Ok(AccessLevel::Owner);
    }
    let sharer = sharing.sharer(user);
    Ok(if sharer.can_edit(resource).await? {
        AccessLevel::Edit
    } else if sharer.can_read(resource).await? {
        AccessLevel::Read
    } else {
        AccessLevel::None
    })
}
