//! Restlet integration: credential-based granting tickets for service
//! identities.
//!
//! A request matching an integration trigger obtains proxy tickets under
//! that integration's identity instead of the browser session's. Granting
//! tickets are reused through the process-wide credential store (unless
//! disabled) and transparently re-acquired exactly once when the CAS
//! server reports them stale.

use crate::config::RestletIntegration;
use crate::error::{CasError, CasResult};
use crate::services::proxy::fetch_proxy_ticket;
use crate::state::CasState;
use casgate_proto::code::INVALID_TICKET;
use tracing::{info, instrument, warn};

/// Obtain a proxy ticket under a restlet integration identity.
///
/// Restlet-acquired tickets never touch the per-session proxy-ticket
/// cache; every call issues a fresh ticket.
#[instrument(skip(state, integration), fields(integration = %integration.name))]
pub(crate) async fn proxy_ticket_via_restlet(
    state: &CasState,
    integration: &RestletIntegration,
    target_service: &str,
) -> CasResult<String> {
    let cached = if state.config.restlet_cache_enabled {
        state.pgt_store.get(&integration.name).await
    } else {
        None
    };

    let pgt = match cached {
        Some(pgt) => pgt,
        None => acquire_granting_ticket(state, integration).await?,
    };

    match fetch_proxy_ticket(state, &pgt, target_service).await {
        Err(CasError::ProxyRejected { ref code, .. }) if code == INVALID_TICKET => {
            warn!("granting ticket is stale, re-acquiring once");
            state.pgt_store.remove(&integration.name).await;
            let fresh = acquire_granting_ticket(state, integration).await?;
            fetch_proxy_ticket(state, &fresh, target_service).await
        }
        other => other,
    }
}

/// Acquire a fresh granting ticket via the credential endpoint.
async fn acquire_granting_ticket(
    state: &CasState,
    integration: &RestletIntegration,
) -> CasResult<String> {
    let path = state
        .config
        .paths
        .restlet_integration
        .as_deref()
        .ok_or_else(|| {
            CasError::Config("restlet integration endpoint is not configured".to_string())
        })?;
    let url = state.config.server_url(path);

    let body = state.client.restlet_ticket(&url, &integration.params).await?;
    let pgt = casgate_proto::extract_granting_ticket(&body)
        .map_err(|e| CasError::UnexpectedResponse(e.to_string()))?;

    if state.config.restlet_cache_enabled {
        state.pgt_store.put(&integration.name, &pgt).await;
    }

    info!(integration = %integration.name, "granting ticket acquired via credentials");
    Ok(pgt)
}
