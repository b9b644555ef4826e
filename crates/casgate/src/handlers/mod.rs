//! HTTP handlers for the CAS endpoints mounted on this application.

pub mod logout;
pub mod proxy_callback;
pub mod validate;

pub use logout::logout;
pub use proxy_callback::proxy_callback;
pub use validate::{single_logout, validate};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// A 302 redirect; CAS flows conventionally use Found rather than the
/// 303/307 variants.
pub(crate) fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
