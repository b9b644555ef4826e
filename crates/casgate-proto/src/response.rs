//! Parse `cas:serviceResponse` XML bodies.
//!
//! The same envelope carries four payloads: `authenticationSuccess` /
//! `authenticationFailure` from the service-validation endpoint and
//! `proxySuccess` / `proxyFailure` from the proxy endpoint. Element names
//! are matched by local name so any `cas:` prefix binding is accepted.

use crate::error::{ProtoError, ProtoResult};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Upper bound on response bodies we are willing to parse.
const MAX_RESPONSE_LEN: usize = 512 * 1024;

/// Outcome of a service-ticket validation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceValidation {
    Success {
        user: String,
        /// Present when the server was asked for a proxy callback; redeemed
        /// out-of-band for the real proxy-granting ticket.
        pgt_iou: Option<String>,
    },
    Failure {
        code: String,
        message: String,
    },
}

/// Outcome of a proxy-ticket grant response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyGrant {
    Success { proxy_ticket: String },
    Failure { code: String, message: String },
}

/// Parse the body of a `/serviceValidate` response.
pub fn parse_service_validation(xml: &str) -> ProtoResult<ServiceValidation> {
    if xml.len() > MAX_RESPONSE_LEN {
        return Err(ProtoError::MalformedResponse("response too large".to_string()));
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_envelope = false;
    let mut saw_success = false;
    let mut failure_code = None;
    let mut user = None;
    let mut pgt_iou = None;
    let mut message = String::new();
    let mut current_element = String::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local = String::from_utf8_lossy(e.local_name().into_inner()).to_string();
                match local.as_str() {
                    "serviceResponse" => saw_envelope = true,
                    "authenticationSuccess" => saw_success = true,
                    "authenticationFailure" => {
                        failure_code = Some(attr_value(e, "code").unwrap_or_default());
                    }
                    _ => {}
                }
                current_element = local;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current_element.as_str() {
                    "user" => user = Some(text),
                    "proxyGrantingTicket" => pgt_iou = Some(text),
                    "authenticationFailure" => message = text.trim().to_string(),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current_element.clear(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(ProtoError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !saw_envelope {
        return Err(ProtoError::MalformedResponse(
            "missing serviceResponse envelope".to_string(),
        ));
    }

    if saw_success {
        let user = user.ok_or_else(|| {
            ProtoError::MalformedResponse("authenticationSuccess without user".to_string())
        })?;
        Ok(ServiceValidation::Success { user, pgt_iou })
    } else if let Some(code) = failure_code {
        Ok(ServiceValidation::Failure { code, message })
    } else {
        Err(ProtoError::MalformedResponse(
            "neither authenticationSuccess nor authenticationFailure present".to_string(),
        ))
    }
}

/// Parse the body of a `/proxy` response.
pub fn parse_proxy_grant(xml: &str) -> ProtoResult<ProxyGrant> {
    if xml.len() > MAX_RESPONSE_LEN {
        return Err(ProtoError::MalformedResponse("response too large".to_string()));
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut saw_envelope = false;
    let mut saw_success = false;
    let mut failure_code = None;
    let mut proxy_ticket = None;
    let mut message = String::new();
    let mut current_element = String::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local = String::from_utf8_lossy(e.local_name().into_inner()).to_string();
                match local.as_str() {
                    "serviceResponse" => saw_envelope = true,
                    "proxySuccess" => saw_success = true,
                    "proxyFailure" => {
                        failure_code = Some(attr_value(e, "code").unwrap_or_default());
                    }
                    _ => {}
                }
                current_element = local;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current_element.as_str() {
                    "proxyTicket" => proxy_ticket = Some(text),
                    "proxyFailure" => message = text.trim().to_string(),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current_element.clear(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(ProtoError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !saw_envelope {
        return Err(ProtoError::MalformedResponse(
            "missing serviceResponse envelope".to_string(),
        ));
    }

    if saw_success {
        let proxy_ticket = proxy_ticket.ok_or_else(|| {
            ProtoError::MalformedResponse("proxySuccess without proxyTicket".to_string())
        })?;
        Ok(ProxyGrant::Success { proxy_ticket })
    } else if let Some(code) = failure_code {
        Ok(ProxyGrant::Failure { code, message })
    } else {
        Err(ProtoError::MalformedResponse(
            "neither proxySuccess nor proxyFailure present".to_string(),
        ))
    }
}

fn attr_value(e: &quick_xml::events::BytesStart<'_>, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.local_name().into_inner()).to_string();
        if key == name {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}
