//! Restlet integration: credential-based granting tickets, caching and
//! the one-shot stale-ticket retry.

mod common;

use axum::http::StatusCode;
use casgate::{CasConfigBuilder, RestletIntegration, RestletParams};
use common::*;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn demo_params() -> RestletParams {
    RestletParams {
        username: "restlet-bot".to_string(),
        password: "s3cret".to_string(),
        ticket_type: "8".to_string(),
        from: SERVICE_PREFIX.to_string(),
    }
}

fn with_restlet(builder: CasConfigBuilder) -> CasConfigBuilder {
    builder
        .restlet_integration_path("/cas/v1/tickets")
        .restlet_integration(RestletIntegration::new(
            "demo1",
            |ctx| ctx.path().contains("restlet"),
            demo_params(),
        ))
}

async fn mount_unique_proxy(h: &TestHarness) {
    Mock::given(method("GET"))
        .and(path("/cas/proxy"))
        .respond_with(UniqueProxyTicket)
        .mount(&h.cas)
        .await;
}

#[tokio::test]
async fn restlet_request_needs_no_login() {
    let h = proxy_harness(with_restlet).await;
    mount_unique_proxy(&h).await;
    Mock::given(method("POST"))
        .and(path("/cas/v1/tickets"))
        .and(body_string_contains("username=restlet-bot"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(restlet_html("TGT-demo-1")))
        .expect(1)
        .mount(&h.cas)
        .await;

    let (status, _, ticket) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ticket.starts_with("PT-"));

    assert_eq!(
        h.state.pgt_store.get("demo1").await,
        Some("TGT-demo-1".to_string())
    );
}

#[tokio::test]
async fn granting_ticket_is_reused_across_calls() {
    let h = proxy_harness(with_restlet).await;
    mount_unique_proxy(&h).await;
    Mock::given(method("POST"))
        .and(path("/cas/v1/tickets"))
        .respond_with(UniqueGrantingTicket)
        .expect(1)
        .mount(&h.cas)
        .await;

    let (status, _, first) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::OK);
    let cached_pgt = h.state.pgt_store.get("demo1").await.unwrap();

    let (status, _, second) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::OK);

    // Same granting ticket, fresh proxy ticket each call.
    assert_eq!(h.state.pgt_store.get("demo1").await.unwrap(), cached_pgt);
    assert_ne!(first, second);
}

#[tokio::test]
async fn disabled_cache_acquires_fresh_granting_tickets() {
    let h = proxy_harness(|b| with_restlet(b).restlet_cache(false)).await;
    mount_unique_proxy(&h).await;
    Mock::given(method("POST"))
        .and(path("/cas/v1/tickets"))
        .respond_with(UniqueGrantingTicket)
        .expect(2)
        .mount(&h.cas)
        .await;

    let (status, _, first) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, second) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_ne!(first, second);
    assert!(h.state.pgt_store.is_empty().await);
}

#[tokio::test]
async fn stale_granting_ticket_is_replaced_transparently() {
    let h = proxy_harness(with_restlet).await;
    h.state.pgt_store.put("demo1", "TGT-stale").await;

    Mock::given(method("GET"))
        .and(path("/cas/proxy"))
        .and(query_param("pgt", "TGT-stale"))
        .respond_with(ResponseTemplate::new(200).set_body_string(proxy_failure_xml("INVALID_TICKET")))
        .mount(&h.cas)
        .await;
    Mock::given(method("GET"))
        .and(path("/cas/proxy"))
        .and(query_param("pgt", "TGT-fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string(proxy_success_xml("PT-after-retry")))
        .mount(&h.cas)
        .await;
    Mock::given(method("POST"))
        .and(path("/cas/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_string(restlet_html("TGT-fresh")))
        .expect(1)
        .mount(&h.cas)
        .await;

    let (status, _, ticket) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket, "PT-after-retry");
    assert_eq!(
        h.state.pgt_store.get("demo1").await,
        Some("TGT-fresh".to_string())
    );
}

#[tokio::test]
async fn second_failure_propagates_without_a_third_attempt() {
    let h = proxy_harness(with_restlet).await;
    h.state.pgt_store.put("demo1", "TGT-stale").await;

    Mock::given(method("GET"))
        .and(path("/cas/proxy"))
        .and(query_param("pgt", "TGT-stale"))
        .respond_with(ResponseTemplate::new(200).set_body_string(proxy_failure_xml("INVALID_TICKET")))
        .expect(1)
        .mount(&h.cas)
        .await;
    // The retried call fails too, for a different reason.
    Mock::given(method("GET"))
        .and(path("/cas/proxy"))
        .and(query_param("pgt", "TGT-fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string(proxy_failure_xml("INVALID_REQUEST")))
        .expect(1)
        .mount(&h.cas)
        .await;
    Mock::given(method("POST"))
        .and(path("/cas/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_string(restlet_html("TGT-fresh")))
        .expect(1)
        .mount(&h.cas)
        .await;

    let (status, _, _) = send_get(&h.app, "/restlet", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The fresh ticket replaced the stale one even though the call failed.
    assert_eq!(
        h.state.pgt_store.get("demo1").await,
        Some("TGT-fresh".to_string())
    );
}

#[tokio::test]
async fn restlet_identity_does_not_disturb_the_logged_in_session() {
    let h = proxy_harness(with_restlet).await;
    mount_unique_proxy(&h).await;
    Mock::given(method("POST"))
        .and(path("/cas/v1/tickets"))
        .respond_with(UniqueGrantingTicket)
        .mount(&h.cas)
        .await;

    let session = login(&h).await;

    let (status, _, body) = send_get(&h.app, "/", Some(&session.cookie)).await;
    assert_eq!(status, StatusCode::OK);
    let before: serde_json::Value = serde_json::from_str(&body).unwrap();
    let session_pgt = before["pgt"].as_str().unwrap().to_string();

    let (status, _, session_pt) = send_get(&h.app, "/pt", Some(&session.cookie)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, restlet_pt) = send_get(&h.app, "/restlet", Some(&session.cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(session_pt, restlet_pt);

    // The browser identity is untouched by the restlet call.
    let (status, _, body) = send_get(&h.app, "/", Some(&session.cookie)).await;
    assert_eq!(status, StatusCode::OK);
    let after: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(after["user"].as_str().unwrap(), USER);
    assert_eq!(after["pgt"].as_str().unwrap(), session_pgt);
    assert_ne!(
        h.state.pgt_store.get("demo1").await.unwrap(),
        session_pgt,
        "restlet identity and session identity must stay distinct"
    );
}
