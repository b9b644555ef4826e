//! Per-request context handles.
//!
//! [`RequestContext`] is an immutable snapshot of the incoming request
//! (method, URI, headers) handed to user-supplied callbacks: login-path
//! functions, cache-filter predicates, restlet triggers, redirect
//! resolvers and hooks.
//!
//! [`CasContext`] is the per-request surface the authentication gate
//! inserts into request extensions; application handlers extract it to
//! obtain proxy tickets for downstream services.

use crate::config::CasConfig;
use crate::error::CasResult;
use crate::services;
use crate::services::proxy::ProxyTicketOptions;
use crate::session::Session;
use crate::state::CasState;
use axum::http::{HeaderMap, Method, Request, Uri};
use std::sync::Arc;

/// Immutable snapshot of an incoming request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    /// Snapshot the relevant parts of a request.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
        }
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// A header value, when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The absolute URL of this request as seen from outside, used as the
    /// post-login return target.
    #[must_use]
    pub fn origin_url(&self, config: &CasConfig) -> String {
        match self.uri.path_and_query() {
            Some(path_and_query) => format!("{}{}", config.service_prefix, path_and_query),
            None => config.service_prefix.clone(),
        }
    }
}

/// Per-request CAS surface, inserted into request extensions by the
/// authentication gate.
#[derive(Clone)]
pub struct CasContext {
    state: CasState,
    session: Session,
    request: Arc<RequestContext>,
}

impl CasContext {
    pub(crate) fn new(state: CasState, session: Session, request: Arc<RequestContext>) -> Self {
        Self {
            state,
            session,
            request,
        }
    }

    /// The session bound to this request.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The request snapshot this context was built from.
    #[must_use]
    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Obtain a proxy ticket for `target_service`.
    ///
    /// When the request matched a restlet integration trigger the ticket is
    /// acquired under that integration's service identity; otherwise the
    /// session's proxy-granting ticket is used, consulting the per-session
    /// proxy-ticket cache.
    ///
    /// `options` accepts either [`ProxyTicketOptions`] or a plain `bool`,
    /// the latter being a backward-compatible shorthand for
    /// `disable_cache`.
    pub async fn get_proxy_ticket(
        &self,
        target_service: &str,
        options: impl Into<ProxyTicketOptions>,
    ) -> CasResult<String> {
        let options = options.into();
        if let Some(integration) = self.state.config.matched_restlet(&self.request) {
            return services::restlet::proxy_ticket_via_restlet(
                &self.state,
                integration,
                target_service,
            )
            .await;
        }
        services::proxy::get_proxy_ticket(
            &self.state,
            &self.session,
            &self.request,
            target_service,
            options,
        )
        .await
    }
}
