use std::sync::Arc;

use crate::{
    error::{Error, Result},
    keygen::KeyGenerator,
    models::LinkEntry,
    store::{LinkStore, PutOutcome},
};

/// How many candidate keys to try before declaring the keyspace exhausted.
/// With 62^6 possible codes a single collision is already rare; hitting the
/// budget means the generator or the store is misbehaving.
const MAX_CREATE_ATTEMPTS: u32 = 5;

/// Orchestrates key generation and store access. Stateless per request; the
/// store and generator are the only shared collaborators.
#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    keygen: Arc<dyn KeyGenerator>,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, keygen: Arc<dyn KeyGenerator>) -> Self {
        Self { store, keygen }
    }

    /// Create a link entry for `url` owned by `owner_id` and return the
    /// persisted entry, echoing the generated key.
    ///
    /// Uniqueness is enforced solely by the store's atomic conditional
    /// insert; on a collision a fresh key is generated and the insert
    /// retried, up to `MAX_CREATE_ATTEMPTS` times. The success path performs
    /// exactly one durable write; validation failure performs none.
    pub async fn create(&self, url: &str, owner_id: &str) -> Result<LinkEntry> {
        if url.is_empty() {
            return Err(Error::InvalidRequest("url must not be empty"));
        }

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let key = self.keygen.generate()?;
            let entry = LinkEntry::new(key, url, owner_id);

            match self.store.put_if_absent(entry.clone()).await? {
                PutOutcome::Created => {
                    tracing::info!("created link {} -> {} (owner {})", entry.key, url, owner_id);
                    return Ok(entry);
                }
                PutOutcome::AlreadyExists => {
                    tracing::warn!(
                        "key collision on '{}' (attempt {}/{}), regenerating",
                        entry.key,
                        attempt,
                        MAX_CREATE_ATTEMPTS
                    );
                }
            }
        }

        Err(Error::KeyspaceExhausted(MAX_CREATE_ATTEMPTS))
    }

    /// Resolve `key` to its target URL. Pure read; an absent entry, or one
    /// whose stored URL is empty, resolves to `NotFound`.
    pub async fn resolve(&self, key: &str) -> Result<String> {
        match self.store.get(key).await? {
            Some(entry) if !entry.url.is_empty() => Ok(entry.url),
            _ => Err(Error::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keygen::RandomKeyGenerator, store::memory::MemoryLinkStore};
    use std::sync::Mutex;

    /// Test generator that replays a scripted key sequence, then repeats the
    /// last key forever. Lets tests force collisions deterministically.
    struct ScriptedKeys {
        keys: Mutex<Vec<&'static str>>,
        last: &'static str,
    }

    impl ScriptedKeys {
        fn new(keys: Vec<&'static str>) -> Self {
            let last = keys.last().copied().unwrap();
            Self {
                keys: Mutex::new(keys),
                last,
            }
        }
    }

    impl KeyGenerator for ScriptedKeys {
        fn generate(&self) -> Result<String> {
            let mut keys = self.keys.lock().unwrap();
            if keys.is_empty() {
                Ok(self.last.to_owned())
            } else {
                Ok(keys.remove(0).to_owned())
            }
        }
    }

    fn service_with(store: MemoryLinkStore, keygen: Arc<dyn KeyGenerator>) -> LinkService {
        LinkService::new(Arc::new(store), keygen)
    }

    #[tokio::test]
    async fn create_then_resolve_round_trips() {
        let svc = service_with(MemoryLinkStore::new(), Arc::new(RandomKeyGenerator));

        let entry = svc.create("https://example.com/long", "alice").await.unwrap();
        assert_eq!(entry.key.len(), 6);
        assert_eq!(entry.owner_id, "alice");

        let url = svc.resolve(&entry.key).await.unwrap();
        assert_eq!(url, "https://example.com/long");

        // Resolve is idempotent and side-effect-free.
        let again = svc.resolve(&entry.key).await.unwrap();
        assert_eq!(again, url);
    }

    #[tokio::test]
    async fn resolve_unknown_key_is_not_found() {
        let svc = service_with(MemoryLinkStore::new(), Arc::new(RandomKeyGenerator));
        assert!(matches!(svc.resolve("nosuch").await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn empty_url_is_rejected_without_a_write() {
        let store = MemoryLinkStore::new();
        let svc = service_with(store.clone(), Arc::new(RandomKeyGenerator));

        assert!(matches!(
            svc.create("", "alice").await,
            Err(Error::InvalidRequest(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn collision_retries_onto_a_fresh_key() {
        let store = MemoryLinkStore::new();
        let svc = service_with(
            store.clone(),
            Arc::new(ScriptedKeys::new(vec!["sameKy", "sameKy", "freshK"])),
        );

        // First creator takes "sameKy".
        let first = svc.create("https://example.com/a", "alice").await.unwrap();
        assert_eq!(first.key, "sameKy");

        // Second creator is forced to the same candidate, collides, retries.
        let second = svc.create("https://example.com/b", "bob").await.unwrap();
        assert_eq!(second.key, "freshK");

        // Both mappings intact; neither overwrote the other.
        assert_eq!(svc.resolve("sameKy").await.unwrap(), "https://example.com/a");
        assert_eq!(svc.resolve("freshK").await.unwrap(), "https://example.com/b");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn pinned_generator_exhausts_the_retry_budget() {
        let store = MemoryLinkStore::new();
        let svc = service_with(store.clone(), Arc::new(ScriptedKeys::new(vec!["stuckK"])));

        svc.create("https://example.com/a", "alice").await.unwrap();

        match svc.create("https://example.com/b", "bob").await {
            Err(Error::KeyspaceExhausted(attempts)) => assert_eq!(attempts, 5),
            other => panic!("expected KeyspaceExhausted, got {:?}", other.map(|e| e.key)),
        }

        // Only the original mapping survives.
        assert_eq!(store.len(), 1);
        assert_eq!(svc.resolve("stuckK").await.unwrap(), "https://example.com/a");
    }

    #[tokio::test]
    async fn entry_with_empty_stored_url_resolves_to_not_found() {
        let store = MemoryLinkStore::new();
        store
            .put_if_absent(LinkEntry::new("blankU", "", "admin"))
            .await
            .unwrap();

        let svc = service_with(store, Arc::new(RandomKeyGenerator));
        assert!(matches!(svc.resolve("blankU").await, Err(Error::NotFound)));
    }
}
