//! Ticket lifecycle: creation, listing, status updates, and the audit
//! entries each mutation must produce.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn new_ticket_is_pending_and_owned_by_callers_tenant() {
    let state = create_test_state();
    let token = signup(&state, "admin@acme.com", "ADMIN", "acme").await;

    let response = request(
        &state,
        "POST",
        "/tickets",
        Some(&token),
        Some(json!({ "title": "X", "description": "Y" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let ticket = body_json(response).await;

    assert_eq!(ticket["status"], "pending");
    assert_eq!(ticket["tenant_id"], "acme");
    assert_eq!(ticket["title"], "X");
    assert_eq!(ticket["priority"], "medium");
    assert!(!ticket["created_by"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn ticket_creation_is_audited() {
    let state = create_test_state();
    let token = signup(&state, "user@acme.com", "USER", "acme").await;
    let ticket = create_ticket(&state, &token, "Printer on fire").await;

    let response = request(
        &state,
        "GET",
        "/audit?action=TICKET_CREATED&resource_type=ticket",
        Some(&token),
        None,
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["entries"][0]["resource_id"], ticket["id"]);
    assert_eq!(body["entries"][0]["details"]["title"], "Printer on fire");
}

#[tokio::test]
async fn listing_returns_only_the_callers_tenant() {
    let state = create_test_state();
    let acme = signup(&state, "a@acme.com", "USER", "acme").await;
    let globex = signup(&state, "b@globex.com", "USER", "globex").await;

    create_ticket(&state, &acme, "acme ticket").await;
    create_ticket(&state, &globex, "globex one").await;
    create_ticket(&state, &globex, "globex two").await;

    let response = request(&state, "GET", "/tickets", Some(&acme), None).await;
    let tickets = body_json(response).await;
    let tickets = tickets.as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["title"], "acme ticket");

    let response = request(&state, "GET", "/tickets", Some(&globex), None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn status_update_records_previous_and_new_status() {
    let state = create_test_state();
    let token = signup(&state, "user@acme.com", "USER", "acme").await;
    let ticket = create_ticket(&state, &token, "X").await;
    let id = ticket["id"].as_str().unwrap();

    let uri = format!("/tickets/{id}/status");
    let response = request(
        &state,
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "in_progress");

    let response = request(
        &state,
        "GET",
        "/audit?action=TICKET_STATUS_UPDATED",
        Some(&token),
        None,
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    let details = &body["entries"][0]["details"];
    assert_eq!(details["status"]["from"], "pending");
    assert_eq!(details["status"]["to"], "in_progress");
}

#[tokio::test]
async fn invalid_status_value_is_rejected() {
    let state = create_test_state();
    let token = signup(&state, "user@acme.com", "USER", "acme").await;
    let ticket = create_ticket(&state, &token, "X").await;
    let id = ticket["id"].as_str().unwrap();

    let uri = format!("/tickets/{id}/status");
    let response = request(
        &state,
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "status": "reopened" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Status is unchanged.
    let response = request(&state, "GET", "/tickets", Some(&token), None).await;
    assert_eq!(body_json(response).await[0]["status"], "pending");
}

#[tokio::test]
async fn updating_another_tenants_ticket_reads_as_not_found() {
    let state = create_test_state();
    let acme = signup(&state, "a@acme.com", "USER", "acme").await;
    let globex = signup(&state, "b@globex.com", "USER", "globex").await;
    let ticket = create_ticket(&state, &acme, "acme ticket").await;
    let id = ticket["id"].as_str().unwrap();

    let uri = format!("/tickets/{id}/status");
    let response = request(
        &state,
        "PATCH",
        &uri,
        Some(&globex),
        Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = request(&state, "GET", "/tickets", Some(&acme), None).await;
    assert_eq!(body_json(response).await[0]["status"], "pending");
}

#[tokio::test]
async fn repeated_identical_status_update_is_idempotent_but_still_audited() {
    let state = create_test_state();
    let token = signup(&state, "user@acme.com", "USER", "acme").await;
    let ticket = create_ticket(&state, &token, "X").await;
    let id = ticket["id"].as_str().unwrap();
    let uri = format!("/tickets/{id}/status");

    for _ in 0..2 {
        let response = request(
            &state,
            "PATCH",
            &uri,
            Some(&token),
            Some(json!({ "status": "complete" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "complete");
    }

    // One audit entry per call, even when nothing changed.
    let response = request(
        &state,
        "GET",
        "/audit?action=TICKET_STATUS_UPDATED",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["pagination"]["total"], 2);
}
