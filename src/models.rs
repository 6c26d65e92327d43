use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened link record.
///
/// `key` is immutable once created and unique across the store; the store's
/// atomic conditional insert is the sole arbiter of that uniqueness. The
/// owner identity and creation time are never serialized to API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LinkEntry {
    pub key: String,
    pub url: String,
    #[serde(skip_serializing)]
    pub owner_id: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl LinkEntry {
    pub fn new(key: impl Into<String>, url: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            owner_id: owner_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// One issued API key as listed by the external key-issuance registry.
/// Read-only from this core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKeyRecord {
    /// Identity label; becomes the principal on successful authorization.
    pub name: String,
    /// The bearer token compared against incoming credentials.
    pub secret_value: String,
}
