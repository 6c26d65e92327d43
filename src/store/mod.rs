pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::{error::Result, models::LinkEntry};

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The entry was written; its key was previously absent.
    Created,
    /// An entry with the same key already exists; nothing was written.
    AlreadyExists,
}

/// Abstract durable mapping from short key to link entry.
///
/// `put_if_absent` must be atomic: if two callers race on the same key,
/// exactly one observes `Created` and the other `AlreadyExists`. The core
/// never does a separate existence check before inserting — check-then-act
/// would open a race window the store cannot close.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Point lookup. No side effects.
    async fn get(&self, key: &str) -> Result<Option<LinkEntry>>;

    /// Atomic create-if-absent.
    async fn put_if_absent(&self, entry: LinkEntry) -> Result<PutOutcome>;
}
