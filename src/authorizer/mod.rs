pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::{error::Result, models::ApiKeyRecord};

// ── Registry listing ───────────────────────────────────────────────────────

/// One page of the key registry listing.
#[derive(Debug, Clone)]
pub struct KeyPage {
    pub records: Vec<ApiKeyRecord>,
    /// Opaque token for the next page; `None` on the last page.
    pub next: Option<String>,
}

/// Paginated, read-only view of the external key-issuance registry.
#[async_trait]
pub trait ApiKeyRegistry: Send + Sync {
    /// Fetch one page of issued keys, starting from the beginning when
    /// `page_token` is `None`.
    async fn list_page(&self, page_token: Option<&str>) -> Result<KeyPage>;
}

// ── Policy document ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: Vec<String>,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: Vec<String>,
}

/// IAM-style policy document scoped to exactly one resource — never a
/// blanket grant.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    fn scoped(effect: Effect, resource: &str) -> Self {
        Self {
            version: "2012-10-17".into(),
            statement: vec![PolicyStatement {
                action: vec!["execute-api:Invoke".into()],
                effect,
                resource: vec![resource.to_owned()],
            }],
        }
    }
}

/// The authorization decision: principal identity plus the policy granting
/// or denying the one requested resource.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizerResponse {
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "policyDocument")]
    pub policy_document: PolicyDocument,
}

impl AuthorizerResponse {
    pub fn is_allow(&self) -> bool {
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect == Effect::Allow)
            .unwrap_or(false)
    }
}

// ── Gateway ────────────────────────────────────────────────────────────────

/// Validates a caller-supplied bearer token against the key registry and
/// derives an allow/deny decision for one resource.
#[derive(Clone)]
pub struct AccessGateway {
    registry: Arc<dyn ApiKeyRegistry>,
}

impl AccessGateway {
    pub fn new(registry: Arc<dyn ApiKeyRegistry>) -> Self {
        Self { registry }
    }

    /// Scan the full registry listing, in listing order, for a record whose
    /// secret exactly equals `token`; the first match wins. A match yields
    /// Allow with the record's name as principal; no match yields Deny with
    /// principal "unknown".
    ///
    /// A listing failure propagates as `RegistryUnavailable` — the HTTP
    /// boundary turns that into an explicit error response, never an
    /// ambiguous allow.
    pub async fn authorize(&self, token: &str, resource: &str) -> Result<AuthorizerResponse> {
        let mut page_token: Option<String> = None;

        loop {
            let page = self.registry.list_page(page_token.as_deref()).await?;

            if let Some(record) = page.records.iter().find(|r| r.secret_value == token) {
                return Ok(AuthorizerResponse {
                    principal_id: record.name.clone(),
                    policy_document: PolicyDocument::scoped(Effect::Allow, resource),
                });
            }

            match page.next {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::warn!("denied request to {}: no matching api key", resource);
        Ok(AuthorizerResponse {
            principal_id: "unknown".into(),
            policy_document: PolicyDocument::scoped(Effect::Deny, resource),
        })
    }
}
