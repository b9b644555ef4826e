//! Error types for the CAS client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type for CAS client operations.
pub type CasResult<T> = Result<T, CasError>;

/// CAS client error types.
#[derive(Debug, Error)]
pub enum CasError {
    // Validation phase
    #[error("ticket validation request failed: {0}")]
    ValidationTransport(String),

    #[error("ticket validation response could not be parsed: {0}")]
    ValidationParse(String),

    #[error("ticket validation is failed: [{code}] {message}")]
    ValidationRejected { code: String, message: String },

    #[error("proxy-granting ticket was never delivered for iou {pgt_iou:?}")]
    CorrelationMiss { pgt_iou: Option<String> },

    // Proxy phase
    #[error("session holds no proxy-granting ticket")]
    NoProxyGrantingTicket,

    #[error("proxy request is missing pgt or targetService")]
    InvalidProxyRequest,

    #[error("proxy ticket rejected: [{code}] {message}")]
    ProxyRejected { code: String, message: String },

    // Restlet integration
    #[error("restlet credential request rejected with status {status}")]
    RestletCredentialRejected { status: u16 },

    // Infrastructure
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("unexpected CAS response: {0}")]
    UnexpectedResponse(String),

    #[error("session storage error: {0}")]
    Session(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for CasError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            CasError::ValidationTransport(detail) => {
                tracing::warn!(detail = %detail, "CAS validation transport failure");
                (
                    StatusCode::UNAUTHORIZED,
                    "validation_transport_error",
                    self.to_string(),
                )
            }
            CasError::ValidationParse(detail) => {
                tracing::error!(detail = %detail, "CAS validation response unparseable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "validation_parse_error",
                    self.to_string(),
                )
            }
            CasError::ValidationRejected { code, .. } => {
                tracing::warn!(code = %code, "CAS rejected ticket validation");
                (
                    StatusCode::UNAUTHORIZED,
                    "validation_rejected",
                    self.to_string(),
                )
            }
            CasError::CorrelationMiss { pgt_iou } => {
                tracing::warn!(pgt_iou = ?pgt_iou, "proxy-granting ticket correlation miss");
                (
                    StatusCode::UNAUTHORIZED,
                    "correlation_miss",
                    "proxy-granting ticket was not delivered".to_string(),
                )
            }
            CasError::NoProxyGrantingTicket => (
                StatusCode::UNAUTHORIZED,
                "no_proxy_granting_ticket",
                self.to_string(),
            ),
            CasError::InvalidProxyRequest => (
                StatusCode::BAD_REQUEST,
                "invalid_proxy_request",
                self.to_string(),
            ),
            CasError::ProxyRejected { code, .. } => {
                tracing::warn!(code = %code, "CAS rejected proxy ticket request");
                (StatusCode::UNAUTHORIZED, "proxy_rejected", self.to_string())
            }
            CasError::RestletCredentialRejected { status } => {
                tracing::warn!(status = status, "restlet credential request rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    "restlet_credentials_rejected",
                    self.to_string(),
                )
            }
            CasError::Http(detail) => {
                tracing::error!(detail = %detail, "outbound CAS request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "http_error",
                    "Failed to communicate with the CAS server".to_string(),
                )
            }
            CasError::UnexpectedResponse(detail) => {
                tracing::error!(detail = %detail, "unexpected CAS response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "unexpected_response",
                    "The CAS server returned an unexpected response".to_string(),
                )
            }
            CasError::Session(detail) => {
                tracing::error!(detail = %detail, "session storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "session_error",
                    "Session storage error".to_string(),
                )
            }
            CasError::Config(detail) => {
                tracing::error!(detail = %detail, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    self.to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
