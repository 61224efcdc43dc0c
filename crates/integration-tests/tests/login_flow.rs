//! End-to-end tests for the sign-in and session-refresh flow.
//!
//! The router is driven directly; the identity provider and the backend
//! customer store are wiremock servers. No database or listener required.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use haven_integration_tests::{TestContext, body_json, session_cookie};

fn profile_json(sub: &str) -> serde_json::Value {
    json!({
        "subjectId": sub,
        "email": "ada@example.com",
        "phoneNumber": null,
        "displayName": "Ada",
        "photoUrl": "https://img.example.com/ada.png"
    })
}

fn record_json(mobile: &str, code: &str) -> serde_json::Value {
    json!({
        "id": "c-1",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "mobile": mobile,
        "avatar": "",
        "referralCode": code
    })
}

#[tokio::test]
async fn test_sign_in_enriches_token_from_backend_store() {
    let ctx = TestContext::new().await;
    let sub = format!("sub-{}", uuid::Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{sub}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(&sub)))
        .mount(&ctx.provider)
        .await;

    Mock::given(method("POST"))
        .and(path("/customer"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.backend)
        .await;
    // OAuth login: no mobile yet, so the primary lookup key is empty ...
    Mock::given(method("GET"))
        .and(path("/customer/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.backend)
        .await;
    // ... and the email fallback is what resolves the record.
    Mock::given(method("GET"))
        .and(path("/customer/ada%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json("999", "R1")))
        .mount(&ctx.backend)
        .await;

    let assertion = ctx.sign_assertion(&sub);
    let response = ctx
        .post_json("/api/auth/login", &json!({ "assertion": assertion }), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie set");
    assert!(cookie.starts_with("haven_session="));

    let session = body_json(response).await;
    assert_eq!(session["user"]["email"], "ada@example.com");
    assert_eq!(session["user"]["name"], "Ada Lovelace");
    assert_eq!(session["user"]["mobile"], "999");
    assert_eq!(session["user"]["referralCode"], "R1");
    assert_eq!(session["user"]["image"], "https://img.example.com/ada.png");
}

#[tokio::test]
async fn test_sign_in_rejects_tampered_assertion() {
    let ctx = TestContext::new().await;

    let mut assertion = ctx.sign_assertion("sub-1");
    assertion.pop();
    assertion.push('A');

    let response = ctx
        .post_json("/api/auth/login", &json!({ "assertion": assertion }), None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_sign_in_survives_backend_outage() {
    let ctx = TestContext::new().await;
    let sub = format!("sub-{}", uuid::Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{sub}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(&sub)))
        .mount(&ctx.provider)
        .await;
    // Customer store is down: upsert and every lookup fail.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.backend)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.backend)
        .await;

    let assertion = ctx.sign_assertion(&sub);
    let response = ctx
        .post_json("/api/auth/login", &json!({ "assertion": assertion }), None)
        .await;

    // Authentication must not fail; the session carries provider values.
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await;
    assert_eq!(session["user"]["email"], "ada@example.com");
    assert_eq!(session["user"]["name"], "Ada");
    assert_eq!(session["user"]["mobile"], "");
    assert_eq!(session["user"]["referralCode"], "");
}

#[tokio::test]
async fn test_session_endpoint_resolves_on_every_request() {
    let ctx = TestContext::new().await;
    let sub = format!("sub-{}", uuid::Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{sub}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(&sub)))
        .mount(&ctx.provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/customer"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&ctx.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/customer/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/customer/ada%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json("999", "R1")))
        .mount(&ctx.backend)
        .await;

    let assertion = ctx.sign_assertion(&sub);
    let login = ctx
        .post_json("/api/auth/login", &json!({ "assertion": assertion }), None)
        .await;
    let cookie = session_cookie(&login).expect("session cookie set");

    // The store has moved on since login; the next request must observe it.
    Mock::given(method("GET"))
        .and(path("/customer/999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json("999", "R2")))
        .mount(&ctx.backend)
        .await;

    let response = ctx.get("/api/session", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let session = body_json(response).await;
    assert_eq!(session["user"]["referralCode"], "R2");
}

#[tokio::test]
async fn test_session_endpoint_requires_authentication() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/session", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let ctx = TestContext::new().await;
    let sub = format!("sub-{}", uuid::Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{sub}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(&sub)))
        .mount(&ctx.provider)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&ctx.backend)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.backend)
        .await;

    let assertion = ctx.sign_assertion(&sub);
    let login = ctx
        .post_json("/api/auth/login", &json!({ "assertion": assertion }), None)
        .await;
    let cookie = session_cookie(&login).expect("session cookie set");

    let response = ctx
        .post_json("/auth/logout", &json!({}), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");

    let after = ctx.get("/api/session", Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}
