//! Outbound HTTP calls to the CAS server.
//!
//! Thin wrapper over `reqwest` translating transport failures into the
//! error taxonomy of the calling phase: validation calls surface
//! [`CasError::ValidationTransport`], proxy calls [`CasError::Http`], and
//! restlet credential posts [`CasError::RestletCredentialRejected`] on
//! non-2xx status.

use crate::config::RestletParams;
use crate::error::{CasError, CasResult};
use std::time::Duration;
use tracing::instrument;

/// HTTP client for the CAS server.
#[derive(Debug, Clone)]
pub struct CasClient {
    http: reqwest::Client,
}

impl CasClient {
    /// Create a client with a 30 second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Call the service-validation endpoint; returns the raw XML body.
    #[instrument(skip(self, query))]
    pub async fn service_validate(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> CasResult<String> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CasError::ValidationTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CasError::ValidationTransport(format!(
                "HTTP status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| CasError::ValidationTransport(e.to_string()))
    }

    /// Call the proxy endpoint; returns the raw XML body.
    #[instrument(skip(self, pgt))]
    pub async fn proxy_grant(
        &self,
        url: &str,
        pgt: &str,
        target_service: &str,
    ) -> CasResult<String> {
        let response = self
            .http
            .get(url)
            .query(&[("pgt", pgt), ("targetService", target_service)])
            .send()
            .await
            .map_err(|e| CasError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CasError::Http(format!("HTTP status {status}")));
        }

        response.text().await.map_err(|e| CasError::Http(e.to_string()))
    }

    /// Post credentials to the restlet ticket endpoint; returns the raw
    /// HTML body embedding the created ticket.
    #[instrument(skip(self, params), fields(username = %params.username))]
    pub async fn restlet_ticket(&self, url: &str, params: &RestletParams) -> CasResult<String> {
        let form = [
            ("username", params.username.as_str()),
            ("password", params.password.as_str()),
            ("type", params.ticket_type.as_str()),
            ("from", params.from.as_str()),
        ];
        let response = self
            .http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| CasError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CasError::RestletCredentialRejected {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| CasError::Http(e.to_string()))
    }
}

impl Default for CasClient {
    fn default() -> Self {
        Self::new()
    }
}
