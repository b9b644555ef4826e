//! Parse incoming single-logout notification XML.
//!
//! CAS servers post a SAML-style `LogoutRequest` whose `SessionIndex`
//! element carries the service ticket that was issued at login.

use crate::error::{ProtoError, ProtoResult};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Upper bound on logout bodies we are willing to parse.
const MAX_REQUEST_LEN: usize = 512 * 1024;

/// Parsed logout notification data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutNotification {
    /// The service ticket issued at login, used to locate the session.
    pub session_index: String,
    /// The NameID carried by the request; servers commonly send a
    /// placeholder here, so it is informational only.
    pub name_id: Option<String>,
}

/// Parse a `LogoutRequest` body.
pub fn parse_logout_request(xml: &str) -> ProtoResult<LogoutNotification> {
    if xml.len() > MAX_REQUEST_LEN {
        return Err(ProtoError::MalformedLogoutRequest(
            "LogoutRequest too large".to_string(),
        ));
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_logout_request = false;
    let mut session_index = None;
    let mut name_id = None;
    let mut current_element = String::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local = String::from_utf8_lossy(e.local_name().into_inner()).to_string();
                if local == "LogoutRequest" {
                    saw_logout_request = true;
                }
                current_element = local;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current_element.as_str() {
                    "SessionIndex" => session_index = Some(text),
                    "NameID" => name_id = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current_element.clear(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ProtoError::MalformedLogoutRequest(format!(
                    "XML parse error: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_logout_request {
        return Err(ProtoError::MalformedLogoutRequest(
            "missing LogoutRequest element".to_string(),
        ));
    }

    let session_index = session_index.ok_or_else(|| {
        ProtoError::MalformedLogoutRequest("missing SessionIndex".to_string())
    })?;

    if session_index.len() > 256 {
        return Err(ProtoError::MalformedLogoutRequest(
            "SessionIndex too long (max 256)".to_string(),
        ));
    }

    Ok(LogoutNotification {
        session_index,
        name_id,
    })
}
