use async_trait::async_trait;

use crate::{
    authorizer::{ApiKeyRegistry, KeyPage},
    error::Result,
    models::ApiKeyRecord,
};

/// Fixed-size pages so even small registries exercise the pagination path.
const PAGE_SIZE: usize = 2;

/// In-memory registry over a fixed record list, paged in listing order.
/// Used by tests and ephemeral deployments.
#[derive(Clone, Debug, Default)]
pub struct MemoryApiKeyRegistry {
    records: Vec<ApiKeyRecord>,
}

impl MemoryApiKeyRegistry {
    pub fn new(records: Vec<ApiKeyRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ApiKeyRegistry for MemoryApiKeyRegistry {
    async fn list_page(&self, page_token: Option<&str>) -> Result<KeyPage> {
        let start = match page_token {
            Some(token) => token.parse::<usize>().unwrap_or(0),
            None => 0,
        };
        let end = (start + PAGE_SIZE).min(self.records.len());

        Ok(KeyPage {
            records: self.records[start.min(end)..end].to_vec(),
            next: (end < self.records.len()).then(|| end.to_string()),
        })
    }
}

/// Registry whose listing always fails. Test-only collaborator for the
/// deny-by-failure path.
#[cfg(test)]
pub struct FailingRegistry;

#[cfg(test)]
#[async_trait]
impl ApiKeyRegistry for FailingRegistry {
    async fn list_page(&self, _page_token: Option<&str>) -> Result<KeyPage> {
        Err(crate::error::Error::RegistryUnavailable(anyhow::anyhow!(
            "listing failed"
        )))
    }
}
