use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    authorizer::{ApiKeyRegistry, KeyPage},
    error::{Error, Result},
    models::ApiKeyRecord,
};

/// Rows fetched per listing page.
const PAGE_SIZE: i64 = 50;

/// Key registry backed by an `api_keys` table, listed with keyset pagination
/// ordered by name. The table is owned by the external key-issuance system;
/// this side only ever reads it.
#[derive(Clone, Debug)]
pub struct SqliteApiKeyRegistry {
    pool: SqlitePool,
}

impl SqliteApiKeyRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet, so a fresh
    /// deployment starts cleanly before any keys are issued.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS api_keys (
                 name         TEXT PRIMARY KEY,
                 secret_value TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ApiKeyRegistry for SqliteApiKeyRegistry {
    async fn list_page(&self, page_token: Option<&str>) -> Result<KeyPage> {
        let records: Vec<ApiKeyRecord> = sqlx::query_as(
            "SELECT name, secret_value FROM api_keys
             WHERE name > ?1 ORDER BY name LIMIT ?2",
        )
        .bind(page_token.unwrap_or(""))
        .bind(PAGE_SIZE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::RegistryUnavailable(e.into()))?;

        let next = (records.len() as i64 == PAGE_SIZE)
            .then(|| records.last().map(|r| r.name.clone()))
            .flatten();

        Ok(KeyPage { records, next })
    }
}
