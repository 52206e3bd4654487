//! SQLite implementation of the GrantStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking. Uniqueness of
//! (resource, grantee) is enforced by a table constraint, so concurrent
//! creators race inside SQLite rather than in our code.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use shareable_core::{EntityRef, Grant, GrantId, NewGrant};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::GrantStore;

const GRANT_COLUMNS: &str = "id, resource_type, resource_id, shared_to_type, shared_to_id,
     shared_from_type, shared_from_id, edit";

/// SQLite-based grant store.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }

    fn query_grants(
        conn: &Connection,
        column: &str,
        entity: &EntityRef,
    ) -> Result<Vec<Grant>> {
        let sql = format!(
            "SELECT {} FROM share_models WHERE {col}_type = ?1 AND {col}_id = ?2 ORDER BY id",
            GRANT_COLUMNS,
            col = column,
        );
        let mut stmt = conn.prepare(&sql)?;
        let grants = stmt
            .query_map(params![entity.kind, entity.id], row_to_grant)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(grants)
    }
}

// Helper to convert a row to Grant
fn row_to_grant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Grant> {
    Ok(Grant {
        id: GrantId(row.get("id")?),
        resource: EntityRef::new(row.get::<_, String>("resource_type")?, row.get("resource_id")?),
        grantee: EntityRef::new(
            row.get::<_, String>("shared_to_type")?,
            row.get("shared_to_id")?,
        ),
        grantor: EntityRef::new(
            row.get::<_, String>("shared_from_type")?,
            row.get("shared_from_id")?,
        ),
        edit: row.get("edit")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[async_trait]
impl GrantStore for SqliteStore {
    async fn find_grant(
        &self,
        resource: &EntityRef,
        grantee: &EntityRef,
    ) -> Result<Option<Grant>> {
        let resource = resource.clone();
        let grantee = grantee.clone();

        self.blocking(move |conn| {
            let sql = format!(
                "SELECT {} FROM share_models
                 WHERE resource_type = ?1 AND resource_id = ?2
                   AND shared_to_type = ?3 AND shared_to_id = ?4",
                GRANT_COLUMNS
            );
            let grant = conn
                .query_row(
                    &sql,
                    params![resource.kind, resource.id, grantee.kind, grantee.id],
                    row_to_grant,
                )
                .optional()?;
            Ok(grant)
        })
        .await
    }

    async fn create_grant(&self, grant: &NewGrant) -> Result<Grant> {
        grant.validate()?;
        let grant = grant.clone();

        self.blocking(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO share_models (
                    resource_type, resource_id, shared_to_type, shared_to_id,
                    shared_from_type, shared_from_id, edit
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    grant.resource.kind,
                    grant.resource.id,
                    grant.grantee.kind,
                    grant.grantee.id,
                    grant.grantor.kind,
                    grant.grantor.id,
                    grant.edit,
                ],
            );

            match inserted {
                Ok(_) => {
                    let id = GrantId(conn.last_insert_rowid());
                    Ok(grant.into_grant(id))
                }
                Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict {
                    resource: grant.resource,
                    grantee: grant.grantee,
                }),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn update_grant_edit(&self, grant: &Grant, edit: bool) -> Result<Grant> {
        let mut updated = grant.clone();

        self.blocking(move |conn| {
            let changed = conn.execute(
                "UPDATE share_models SET edit = ?2 WHERE id = ?1",
                params![updated.id.get(), edit],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(updated.id));
            }
            updated.edit = edit;
            Ok(updated)
        })
        .await
    }

    async fn delete_grant(&self, grant: &Grant) -> Result<bool> {
        let id = grant.id;

        self.blocking(move |conn| {
            let removed = conn.execute("DELETE FROM share_models WHERE id = ?1", params![id.get()])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn exists_grant(
        &self,
        resource: &EntityRef,
        grantee: &EntityRef,
        edit: Option<bool>,
    ) -> Result<bool> {
        let resource = resource.clone();
        let grantee = grantee.clone();

        self.blocking(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM share_models
                    WHERE resource_type = ?1 AND resource_id = ?2
                      AND shared_to_type = ?3 AND shared_to_id = ?4
                      AND (?5 IS NULL OR edit = ?5)
                 )",
                params![resource.kind, resource.id, grantee.kind, grantee.id, edit],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn grants_for_resource(&self, resource: &EntityRef) -> Result<Vec<Grant>> {
        let resource = resource.clone();
        self.blocking(move |conn| Self::query_grants(conn, "resource", &resource))
            .await
    }

    async fn grants_from(&self, grantor: &EntityRef) -> Result<Vec<Grant>> {
        let grantor = grantor.clone();
        self.blocking(move |conn| Self::query_grants(conn, "shared_from", &grantor))
            .await
    }

    async fn grants_to(&self, grantee: &EntityRef) -> Result<Vec<Grant>> {
        let grantee = grantee.clone();
        self.blocking(move |conn| Self::query_grants(conn, "shared_to", &grantee))
            .await
    }

    async fn delete_grants_for_resource(&self, resource: &EntityRef) -> Result<u64> {
        let resource = resource.clone();

        self.blocking(move |conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute(
                "DELETE FROM share_models WHERE resource_type = ?1 AND resource_id = ?2",
                params![resource.kind, resource.id],
            )?;
            tx.commit()?;
            Ok(removed as u64)
        })
        .await
    }
}
