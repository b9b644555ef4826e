//! Ticket stores: PGT correlation, per-session proxy-ticket cache and the
//! process-wide restlet credential store.

pub mod correlation;
pub mod credentials;
pub mod proxy_cache;

pub use correlation::CorrelationStore;
pub use credentials::CredentialStore;
pub use proxy_cache::ProxyTicketCache;
