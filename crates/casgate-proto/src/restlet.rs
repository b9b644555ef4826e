//! Extract a granting ticket from a restlet ticket response.
//!
//! The restlet endpoint answers a credential POST with an HTML document
//! whose form posts back to `.../tickets/{ticket}`; the final path segment
//! of that action URL is the freshly created ticket.

use crate::error::{ProtoError, ProtoResult};
use regex::Regex;

const FORM_ACTION: &str = r#"action="([^"]+)""#;

/// Pull the granting ticket out of a restlet HTML response body.
pub fn extract_granting_ticket(html: &str) -> ProtoResult<String> {
    let re = Regex::new(FORM_ACTION).expect("static pattern");
    let action = re
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or(ProtoError::MissingGrantingTicket)?;

    let ticket = action
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or(ProtoError::MissingGrantingTicket)?;

    Ok(ticket.to_string())
}
