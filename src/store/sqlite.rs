use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    error::{Error, Result},
    models::LinkEntry,
    store::{LinkStore, PutOutcome},
};

/// Durable link store backed by SQLite.
///
/// The PRIMARY KEY on `entry_key` supplies the atomic create-if-absent
/// semantics: a racing second insert fails with a unique-constraint
/// violation, which maps to `PutOutcome::AlreadyExists`.
#[derive(Clone, Debug)]
pub struct SqliteLinkStore {
    pool: SqlitePool,
    table: String,
}

impl SqliteLinkStore {
    /// The table name comes from configuration and is interpolated into SQL,
    /// so it is restricted to a plain identifier here.
    pub fn new(pool: SqlitePool, table: &str) -> anyhow::Result<Self> {
        validate_identifier(table)?;
        Ok(Self {
            pool,
            table: table.to_owned(),
        })
    }

    /// Create the backing table if it does not exist yet. Called once at
    /// startup before the server begins accepting requests.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 entry_key  TEXT PRIMARY KEY,
                 entry_url  TEXT NOT NULL,
                 api_key    TEXT NOT NULL,
                 created_at TEXT NOT NULL
             )",
            self.table
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn get(&self, key: &str) -> Result<Option<LinkEntry>> {
        sqlx::query_as(&format!(
            "SELECT entry_key AS key, entry_url AS url, api_key AS owner_id, created_at
             FROM {} WHERE entry_key = ?1",
            self.table
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::StoreUnavailable(e.into()))
    }

    async fn put_if_absent(&self, entry: LinkEntry) -> Result<PutOutcome> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (entry_key, entry_url, api_key, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            self.table
        ))
        .bind(&entry.key)
        .bind(&entry.url)
        .bind(&entry.owner_id)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(PutOutcome::Created),
            Err(sqlx::Error::Database(db))
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Ok(PutOutcome::AlreadyExists)
            }
            Err(e) => Err(Error::StoreUnavailable(e.into())),
        }
    }
}

fn validate_identifier(name: &str) -> anyhow::Result<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if head_ok && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        anyhow::bail!("invalid table name {:?}: must be a plain SQL identifier", name)
    }
}
