//! Shared harness for integration tests: a wiremock CAS server plus an
//! axum application wired through the authentication gate.
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::extract::Query;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use casgate::{
    cas_router, CasConfig, CasConfigBuilder, CasContext, CasError, CasGateLayer, CasState,
    ProxyTicketOptions, SessionLayer,
};
use serde::Deserialize;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request as WiremockRequest, Respond, ResponseTemplate};

pub const SERVICE_PREFIX: &str = "http://127.0.0.1:3002";
pub const USER: &str = "DEFAULT_USER_NAME";

// --- CAS server payloads ---

pub fn validation_success_xml(pgt_iou: Option<&str>) -> String {
    let mut body = String::from(
        "<cas:serviceResponse xmlns:cas='http://www.yale.edu/tp/cas'>\
         <cas:authenticationSuccess><cas:user>DEFAULT_USER_NAME</cas:user>",
    );
    if let Some(iou) = pgt_iou {
        body.push_str(&format!(
            "<cas:proxyGrantingTicket>{iou}</cas:proxyGrantingTicket>"
        ));
    }
    body.push_str("</cas:authenticationSuccess></cas:serviceResponse>");
    body
}

pub fn validation_failure_xml(ticket: &str) -> String {
    format!(
        "<cas:serviceResponse xmlns:cas='http://www.yale.edu/tp/cas'>\
         <cas:authenticationFailure code='INVALID_TICKET'>\
         Ticket {ticket} not recognized\
         </cas:authenticationFailure></cas:serviceResponse>"
    )
}

pub fn proxy_success_xml(proxy_ticket: &str) -> String {
    format!(
        "<cas:serviceResponse xmlns:cas='http://www.yale.edu/tp/cas'>\
         <cas:proxySuccess><cas:proxyTicket>{proxy_ticket}</cas:proxyTicket>\
         </cas:proxySuccess></cas:serviceResponse>"
    )
}

pub fn proxy_failure_xml(code: &str) -> String {
    format!(
        "<cas:serviceResponse xmlns:cas='http://www.yale.edu/tp/cas'>\
         <cas:proxyFailure code='{code}'>proxy request refused</cas:proxyFailure>\
         </cas:serviceResponse>"
    )
}

pub fn restlet_html(granting_ticket: &str) -> String {
    format!(
        r#"<!DOCTYPE HTML PUBLIC "-//IETF//DTD HTML 2.0//EN">
<html><head><title>201 Created</title></head><body><h1>TGT Created</h1>
<form action="http://cas.example.com/cas/v1/tickets/{granting_ticket}" method="POST">
<input type="submit" value="Submit"></form></body></html>"#
    )
}

pub fn logout_xml(ticket: &str) -> String {
    format!(
        r#"<samlp:LogoutRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_lr_1" Version="2.0" IssueInstant="2026-02-21T10:00:00Z"><saml:NameID xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">@NOT_USED@</saml:NameID><samlp:SessionIndex>{ticket}</samlp:SessionIndex></samlp:LogoutRequest>"#
    )
}

/// Responds to every proxy request with a freshly generated ticket, so
/// cache hits and misses are distinguishable by value.
pub struct UniqueProxyTicket;

impl Respond for UniqueProxyTicket {
    fn respond(&self, _request: &WiremockRequest) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_string(proxy_success_xml(&format!("PT-{}", uuid::Uuid::new_v4())))
    }
}

/// Responds to every restlet credential post with a freshly generated
/// granting ticket.
pub struct UniqueGrantingTicket;

impl Respond for UniqueGrantingTicket {
    fn respond(&self, _request: &WiremockRequest) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_string(restlet_html(&format!("TGT-{}", uuid::Uuid::new_v4())))
    }
}

// --- application harness ---

pub struct TestHarness {
    pub app: Router,
    pub state: CasState,
    pub cas: MockServer,
}

/// Build a harness around a fresh mock CAS server. The closure adjusts the
/// configuration; the default is non-proxy mode with standard paths.
pub async fn harness(
    configure: impl FnOnce(CasConfigBuilder) -> CasConfigBuilder,
) -> TestHarness {
    let cas = MockServer::start().await;
    let builder = CasConfig::builder(SERVICE_PREFIX, cas.uri());
    let config = configure(builder).build();
    let state = CasState::new(config);

    let app = Router::new()
        .route("/", get(echo_auth))
        .route("/pt", get(proxy_ticket))
        .route("/restlet", get(proxy_ticket))
        .layer(CasGateLayer::new(state.clone()))
        .layer(SessionLayer::new(&state))
        .merge(cas_router(state.clone()));

    TestHarness { app, state, cas }
}

/// Harness in proxy mode.
pub async fn proxy_harness(
    configure: impl FnOnce(CasConfigBuilder) -> CasConfigBuilder,
) -> TestHarness {
    harness(|builder| configure(builder.proxy_callback("/cas/proxyCallback"))).await
}

async fn echo_auth(Extension(cas): Extension<CasContext>) -> Result<Json<serde_json::Value>, CasError> {
    let auth = cas.session().auth().await?;
    Ok(Json(serde_json::json!({
        "sid": cas.session().id(),
        "user": auth.as_ref().map(|a| a.user.clone()),
        "st": auth.as_ref().map(|a| a.service_ticket.clone()),
        "pgt": auth.as_ref().and_then(|a| a.proxy_granting_ticket.clone()),
    })))
}

#[derive(Debug, Deserialize)]
struct PtQuery {
    #[serde(rename = "targetService")]
    target_service: Option<String>,
    disable_cache: Option<bool>,
    renew: Option<bool>,
    legacy: Option<bool>,
}

async fn proxy_ticket(
    Extension(cas): Extension<CasContext>,
    Query(query): Query<PtQuery>,
) -> Result<String, CasError> {
    let target = query
        .target_service
        .unwrap_or_else(|| "http://downstream.example.com".to_string());
    if query.legacy.unwrap_or(false) {
        // boolean shorthand for disable_cache
        return cas.get_proxy_ticket(&target, true).await;
    }
    cas.get_proxy_ticket(
        &target,
        ProxyTicketOptions {
            disable_cache: query.disable_cache.unwrap_or(false),
            renew: query.renew.unwrap_or(false),
        },
    )
    .await
}

// --- request driving ---

pub async fn send_get(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
) -> (StatusCode, HeaderMap, String) {
    send_get_with_headers(app, uri, cookie, &[]).await
}

pub async fn send_get_with_headers(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    headers: &[(&str, &str)],
) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::empty()).unwrap();
    split(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn send_post(app: &Router, uri: &str, body: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/xml")
        .body(Body::from(body.to_string()))
        .unwrap();
    split(app.clone().oneshot(request).await.unwrap()).await
}

async fn split(response: Response) -> (StatusCode, HeaderMap, String) {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

/// The `NAME=value` pair from the response's `Set-Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(|pair| pair.trim().to_string())
}

pub fn location(headers: &HeaderMap) -> String {
    headers
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

// --- login flow ---

pub struct LoginSession {
    pub cookie: String,
    pub ticket: String,
}

/// Drive a full login: deliver the proxy callback (in proxy mode), mock
/// the validation response for a fresh ticket, and hit the validation
/// mount. Returns the session cookie and the issued service ticket.
pub async fn login(h: &TestHarness) -> LoginSession {
    let ticket = format!("ST-{}", uuid::Uuid::new_v4());

    if h.state.config.proxy_mode() {
        let iou = format!("PGTIOU-{}", uuid::Uuid::new_v4());
        let pgt = format!("PGT-{}", uuid::Uuid::new_v4());

        // The CAS server delivers the PGT out-of-band during validation;
        // replay that callback against our receiver first.
        let (status, _, _) = send_get(
            &h.app,
            &format!("/cas/proxyCallback?pgtIou={iou}&pgtId={pgt}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        Mock::given(method("GET"))
            .and(path("/cas/serviceValidate"))
            .and(query_param("ticket", ticket.as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(validation_success_xml(Some(&iou))),
            )
            .mount(&h.cas)
            .await;
    } else {
        Mock::given(method("GET"))
            .and(path("/cas/serviceValidate"))
            .and(query_param("ticket", ticket.as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(validation_success_xml(None)),
            )
            .mount(&h.cas)
            .await;
    }

    let (status, headers, _) =
        send_get(&h.app, &format!("/cas/validate?ticket={ticket}"), None).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location(&headers), "/");
    let cookie = session_cookie(&headers).expect("session cookie on login response");

    LoginSession { cookie, ticket }
}
