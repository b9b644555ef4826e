//! CAS single-sign-on client for axum applications.
//!
//! casgate turns an axum application into a CAS-protected service:
//! - an authentication gate deciding per request between pass-through,
//!   a redirect to the CAS login page, and an AJAX-aware rejection
//! - service-ticket validation against the CAS server, including
//!   proxy-mode correlation of out-of-band proxy-granting tickets
//! - proxy-ticket acquisition with a per-session TTL cache, bypass
//!   filters and renew semantics
//! - restlet integrations: credential-based granting tickets for
//!   service-to-service identities, with one-shot retry on stale tickets
//! - single logout driven by CAS server notifications
//!
//! # Wiring
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use casgate::{cas_router, CasConfig, CasContext, CasGateLayer, CasState, SessionLayer};
//!
//! let config = CasConfig::builder("http://app.example.com", "https://cas.example.com")
//!     .proxy_callback("/cas/proxyCallback")
//!     .build();
//! let state = CasState::new(config);
//!
//! async fn report(cas: axum::Extension<CasContext>) -> Result<String, casgate::CasError> {
//!     cas.get_proxy_ticket("https://reports.example.com", false).await
//! }
//!
//! let app: Router = Router::new()
//!     .route("/report", get(report))
//!     .layer(CasGateLayer::new(state.clone()))
//!     .layer(SessionLayer::new(&state))
//!     .merge(cas_router(state));
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use client::CasClient;
pub use config::{
    AjaxConfig, CacheConfig, CacheFilter, CasConfig, CasConfigBuilder, Hooks, LoginPath, Paths,
    RestletIntegration, RestletParams,
};
pub use context::{CasContext, RequestContext};
pub use error::{CasError, CasResult, ErrorResponse};
pub use middleware::CasGateLayer;
pub use router::cas_router;
pub use services::ProxyTicketOptions;
pub use session::{
    CasAuth, MemorySessionStore, Session, SessionLayer, SessionState, SessionStore, TicketIndex,
};
pub use state::CasState;
pub use store::{CorrelationStore, CredentialStore, ProxyTicketCache};
