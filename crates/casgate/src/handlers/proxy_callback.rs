//! Proxy callback endpoint.
//!
//! Called by the CAS server itself during ticket validation to deliver the
//! real proxy-granting ticket. The request carries no user session cookie,
//! so the pair goes into the process-wide correlation store. Requests
//! missing either parameter are acknowledged and ignored.

use crate::state::CasState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ProxyCallbackQuery {
    #[serde(rename = "pgtId")]
    pub pgt_id: Option<String>,
    #[serde(rename = "pgtIou")]
    pub pgt_iou: Option<String>,
}

/// Record a delivered `(pgtId, pgtIou)` pair.
pub async fn proxy_callback(
    State(state): State<CasState>,
    Query(query): Query<ProxyCallbackQuery>,
) -> StatusCode {
    match (query.pgt_iou, query.pgt_id) {
        (Some(pgt_iou), Some(pgt_id)) => {
            state.correlations.put(&pgt_iou, &pgt_id).await;
        }
        _ => {
            debug!("proxy callback without pgtId/pgtIou pair, ignoring");
        }
    }
    StatusCode::OK
}
