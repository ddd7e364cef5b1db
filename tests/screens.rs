//! Tenant screen registry: the token's tenant picks the screen set,
//! and unknown tenants fall back to an empty list.

use axum::http::StatusCode;

mod common;
use common::*;

#[tokio::test]
async fn known_tenant_gets_its_screen_set() {
    let state = create_test_state();
    let token = signup(&state, "user@acme.com", "USER", "acme").await;

    let response = request(&state, "GET", "/me/screens", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["tenant"], "acme");
    assert_eq!(body["tenant_name"], "Acme Corp");
    let screens = body["screens"].as_array().unwrap();
    assert_eq!(screens.len(), 1);
    assert_eq!(screens[0]["id"], "support");
    assert_eq!(screens[0]["scope"], "supportApp");
    assert_eq!(screens[0]["route"], "/support");
}

#[tokio::test]
async fn unknown_tenant_gets_an_empty_list_not_an_error() {
    let state = create_test_state();
    let token = signup(&state, "user@umbrella.com", "USER", "umbrella").await;

    let response = request(&state, "GET", "/me/screens", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["tenant"], "umbrella");
    assert!(body.get("tenant_name").is_none());
    assert_eq!(body["screens"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn screens_require_authentication() {
    let state = create_test_state();

    let response = request(&state, "GET", "/me/screens", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
