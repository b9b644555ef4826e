//! Shared CAS client state.

use crate::client::CasClient;
use crate::config::CasConfig;
use crate::session::{MemorySessionStore, SessionStore, TicketIndex};
use crate::store::{CorrelationStore, CredentialStore, ProxyTicketCache};
use std::sync::Arc;

/// Everything the handlers, services and middleware share: configuration,
/// the outbound client and the ticket stores. Cheap to clone.
#[derive(Clone)]
pub struct CasState {
    pub config: Arc<CasConfig>,
    pub client: CasClient,
    pub sessions: Arc<dyn SessionStore>,
    /// Service-ticket-to-session index used by single logout.
    pub tickets: Arc<TicketIndex>,
    /// PGT IOU correlation entries delivered by the proxy callback.
    pub correlations: Arc<CorrelationStore>,
    /// Per-session proxy-ticket cache.
    pub pt_cache: Arc<ProxyTicketCache>,
    /// Process-wide restlet granting-ticket store.
    pub pgt_store: Arc<CredentialStore>,
}

impl CasState {
    /// Build state with in-memory stores.
    #[must_use]
    pub fn new(config: CasConfig) -> Self {
        let config = Arc::new(config);
        Self {
            client: CasClient::new(),
            sessions: Arc::new(MemorySessionStore::new()),
            tickets: Arc::new(TicketIndex::new()),
            correlations: Arc::new(CorrelationStore::new(config.correlation_ttl)),
            pt_cache: Arc::new(ProxyTicketCache::new(config.cache.ttl)),
            pgt_store: Arc::new(CredentialStore::new()),
            config,
        }
    }

    /// Swap in a different session store.
    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }

    /// Swap in a preconfigured outbound client.
    #[must_use]
    pub fn with_client(mut self, client: CasClient) -> Self {
        self.client = client;
        self
    }
}
