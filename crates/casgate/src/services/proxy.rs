//! Proxy-ticket acquisition against the session's proxy-granting ticket.

use crate::context::RequestContext;
use crate::error::{CasError, CasResult};
use crate::session::Session;
use crate::state::CasState;
use casgate_proto::code::INVALID_REQUEST;
use casgate_proto::ProxyGrant;
use tracing::{debug, instrument};

/// Options for a proxy-ticket request.
///
/// Accepted anywhere as `impl Into<ProxyTicketOptions>`; a plain `bool` is
/// the backward-compatible shorthand for `disable_cache`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProxyTicketOptions {
    /// Skip the cache entirely for this call: no read, no write-back.
    pub disable_cache: bool,
    /// Force a fresh ticket but store it, so subsequent calls reuse it.
    pub renew: bool,
}

impl From<bool> for ProxyTicketOptions {
    fn from(disable_cache: bool) -> Self {
        Self {
            disable_cache,
            renew: false,
        }
    }
}

/// Exchange a proxy-granting ticket for a proxy ticket, no caching.
pub(crate) async fn fetch_proxy_ticket(
    state: &CasState,
    pgt: &str,
    target_service: &str,
) -> CasResult<String> {
    if pgt.is_empty() || target_service.is_empty() {
        return Err(CasError::InvalidProxyRequest);
    }

    let url = state.config.server_url(&state.config.paths.proxy);
    let body = state.client.proxy_grant(&url, pgt, target_service).await?;

    match casgate_proto::parse_proxy_grant(&body)
        .map_err(|e| CasError::UnexpectedResponse(e.to_string()))?
    {
        ProxyGrant::Success { proxy_ticket } => Ok(proxy_ticket),
        ProxyGrant::Failure { code, message } if code == INVALID_REQUEST => {
            debug!(message = %message, "proxy request rejected as invalid");
            Err(CasError::InvalidProxyRequest)
        }
        ProxyGrant::Failure { code, message } => Err(CasError::ProxyRejected { code, message }),
    }
}

/// Obtain a proxy ticket for `target_service` on behalf of the session.
///
/// The cache is bypassed for the call when globally disabled, when the
/// options say so, or when the target matches a configured filter; `renew`
/// skips the read but still refreshes the cached value.
#[instrument(skip(state, session, ctx, options), fields(target_service = %target_service))]
pub async fn get_proxy_ticket(
    state: &CasState,
    session: &Session,
    ctx: &RequestContext,
    target_service: &str,
    options: ProxyTicketOptions,
) -> CasResult<String> {
    let pgt = session
        .auth()
        .await?
        .and_then(|auth| auth.proxy_granting_ticket)
        .ok_or(CasError::NoProxyGrantingTicket)?;

    let filtered = state
        .config
        .cache
        .filters
        .iter()
        .any(|filter| filter.matches(target_service, ctx));
    let cacheable = state.config.cache.enable && !options.disable_cache && !filtered;

    if cacheable && !options.renew {
        if let Some(ticket) = state.pt_cache.get(session.id(), target_service).await {
            debug!("proxy ticket served from cache");
            return Ok(ticket);
        }
    }

    let ticket = fetch_proxy_ticket(state, &pgt, target_service).await?;

    if cacheable {
        state
            .pt_cache
            .put(session.id(), target_service, &ticket)
            .await;
    }

    Ok(ticket)
}
