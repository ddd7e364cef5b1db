//! Shared harness for integration tests: the real router over
//! temp-file SQLite databases, driven through tower's `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use flowdesk::db::{self, AppState};
use flowdesk::registry::ScreenRegistry;

pub const TEST_JWT_SECRET: &str = "test-signing-secret";
pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

pub fn create_test_state() -> AppState {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db = db::create_pool(dir.path().join("app.db").to_str().unwrap()).unwrap();
    let audit = db::create_pool(dir.path().join("audit.db").to_str().unwrap()).unwrap();
    db::init_db(&db.get().unwrap()).unwrap();
    db::init_audit_db(&audit.get().unwrap()).unwrap();
    // Keep the database files alive for the rest of the test process.
    std::mem::forget(dir);

    let registry: ScreenRegistry = serde_json::from_value(json!({
        "tenants": {
            "acme": {
                "name": "Acme Corp",
                "screens": [{
                    "id": "support",
                    "name": "Support Tickets",
                    "url": "http://localhost:3002/remoteEntry.js",
                    "scope": "supportApp",
                    "module": "./SupportTicketsApp",
                    "route": "/support"
                }]
            }
        }
    }))
    .unwrap();

    AppState {
        db,
        audit,
        token_key: Arc::new(flowdesk::jwt::signing_key(TEST_JWT_SECRET)),
        webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        registry: Arc::new(registry),
        http: reqwest::Client::new(),
        workflow_webhook_url: None,
        base_url: "http://localhost:3000".to_string(),
        audit_log_enabled: true,
    }
}

/// Fire one request at a fresh clone of the router.
pub async fn request(
    state: &AppState,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    flowdesk::app(state.clone()).oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    role: &str,
    tenant: &str,
) -> Response<Body> {
    request(
        state,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": password,
            "role": role,
            "tenant_id": tenant,
        })),
    )
    .await
}

pub async fn login(state: &AppState, email: &str, password: &str) -> String {
    let response = request(
        state,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Register a user and log them in, returning the token.
pub async fn signup(state: &AppState, email: &str, role: &str, tenant: &str) -> String {
    let response = register(state, email, "pw123", role, tenant).await;
    assert_eq!(response.status(), StatusCode::OK);
    login(state, email, "pw123").await
}

pub async fn create_ticket(state: &AppState, token: &str, title: &str) -> Value {
    let response = request(
        state,
        "POST",
        "/tickets",
        Some(token),
        Some(json!({ "title": title, "description": "details" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
