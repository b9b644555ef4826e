//! Process-wide restlet credential store.
//!
//! Holds at most one proxy-granting ticket per integration name. Entries
//! have no TTL; they are replaced when stale-ticket detection re-acquires
//! a ticket and removed only explicitly. Constructed once per process and
//! injected at construction time.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Maps integration names to their current proxy-granting ticket.
#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The granting ticket cached for an integration.
    pub async fn get(&self, integration: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries.get(integration).cloned()
    }

    /// Cache a granting ticket, replacing any previous one.
    pub async fn put(&self, integration: &str, pgt_id: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(integration.to_string(), pgt_id.to_string());
        debug!(integration = %integration, "granting ticket cached");
    }

    /// Evict an integration's granting ticket.
    pub async fn remove(&self, integration: &str) {
        let mut entries = self.entries.write().await;
        if entries.remove(integration).is_some() {
            debug!(integration = %integration, "granting ticket evicted");
        }
    }

    /// Evict everything.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = CredentialStore::new();
        assert_eq!(store.get("demo").await, None);

        store.put("demo", "PGT-1").await;
        assert_eq!(store.get("demo").await, Some("PGT-1".to_string()));

        store.remove("demo").await;
        assert_eq!(store.get("demo").await, None);
    }

    #[tokio::test]
    async fn test_one_entry_per_integration() {
        let store = CredentialStore::new();
        store.put("demo", "PGT-1").await;
        store.put("demo", "PGT-2").await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("demo").await, Some("PGT-2".to_string()));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = CredentialStore::new();
        store.put("a", "PGT-1").await;
        store.put("b", "PGT-2").await;
        store.clear().await;
        assert!(store.is_empty().await);
    }
}
