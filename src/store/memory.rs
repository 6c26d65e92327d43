use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

use crate::{
    error::Result,
    models::LinkEntry,
    store::{LinkStore, PutOutcome},
};

/// Thread-safe in-memory link store backed by a DashMap.
///
/// The conditional insert goes through the map's entry API, which holds the
/// shard lock across the occupancy check and the write, so racing inserts of
/// one key serialize and exactly one wins. Suited to tests and ephemeral
/// deployments; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryLinkStore {
    inner: Arc<DashMap<String, LinkEntry>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn get(&self, key: &str) -> Result<Option<LinkEntry>> {
        Ok(self.inner.get(key).map(|v| v.clone()))
    }

    async fn put_if_absent(&self, entry: LinkEntry) -> Result<PutOutcome> {
        match self.inner.entry(entry.key.clone()) {
            Entry::Occupied(_) => Ok(PutOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(PutOutcome::Created)
            }
        }
    }
}
