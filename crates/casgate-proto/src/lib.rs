//! CAS protocol wire formats.
//!
//! This crate parses the payloads exchanged with a CAS server:
//! - `cas:serviceResponse` XML bodies returned by the service-validation
//!   and proxy endpoints
//! - SAML-style `LogoutRequest` bodies posted for single logout
//! - the HTML document returned by the restlet ticket endpoint, which
//!   embeds a freshly granted ticket in a form action URL
//!
//! It is framework-free; the `casgate` crate wires these parsers into an
//! axum application.

pub mod error;
pub mod logout;
pub mod response;
pub mod restlet;

pub use error::{ProtoError, ProtoResult};
pub use logout::{parse_logout_request, LogoutNotification};
pub use response::{parse_proxy_grant, parse_service_validation, ProxyGrant, ServiceValidation};
pub use restlet::extract_granting_ticket;

/// Failure codes defined by the CAS protocol.
pub mod code {
    /// The presented ticket (ST, PT or PGT) was not recognized or has expired.
    pub const INVALID_TICKET: &str = "INVALID_TICKET";
    /// A required request parameter was missing.
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
}
