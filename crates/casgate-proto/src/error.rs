//! Error types for CAS payload parsing.

use thiserror::Error;

/// Result type for protocol parsing operations.
pub type ProtoResult<T> = Result<T, ProtoError>;

/// Protocol parsing error types.
#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    #[error("malformed logout request: {0}")]
    MalformedLogoutRequest(String),

    #[error("restlet response does not embed a granting ticket")]
    MissingGrantingTicket,
}
