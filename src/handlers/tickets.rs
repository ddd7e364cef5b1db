use axum::extract::{Extension, State};
use axum::http::HeaderMap;

use crate::audit;
use crate::crypto;
use crate::db::AppState;
use crate::db::queries::{self, NewAuditLog};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::jwt::Principal;
use crate::models::{CreateTicket, Ticket, TicketDoneRequest, UpdateTicketStatus};
use crate::notify;

pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
    Json(input): Json<CreateTicket>,
) -> Result<Json<Ticket>> {
    let conn = state.db.get()?;
    // The partition key comes from the verified principal, never the body.
    let ticket = queries::create_ticket(&conn, &principal.tenant_id, &principal.user_id, &input)?;

    audit::record(
        &state,
        &headers,
        NewAuditLog {
            action: audit::TICKET_CREATED,
            user_id: &principal.user_id,
            tenant_id: &principal.tenant_id,
            resource_type: Some("ticket"),
            resource_id: Some(&ticket.id),
            details: Some(serde_json::json!({
                "title": ticket.title,
                "priority": ticket.priority,
                "status": ticket.status,
            })),
        },
    );

    notify::ticket_created(&state, &ticket);

    Ok(Json(ticket))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Ticket>>> {
    let conn = state.db.get()?;
    let tickets = queries::list_tickets_for_tenant(&conn, &principal.tenant_id)?;
    Ok(Json(tickets))
}

#[derive(serde::Deserialize)]
pub struct TicketPath {
    pub id: String,
}

pub async fn update_ticket_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(path): Path<TicketPath>,
    headers: HeaderMap,
    Json(input): Json<UpdateTicketStatus>,
) -> Result<Json<Ticket>> {
    let conn = state.db.get()?;
    let existing = queries::get_ticket_in_tenant(&conn, &principal.tenant_id, &path.id)?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    queries::update_ticket_status(&conn, &principal.tenant_id, &path.id, input.status)?;

    audit::record(
        &state,
        &headers,
        NewAuditLog {
            action: audit::TICKET_STATUS_UPDATED,
            user_id: &principal.user_id,
            tenant_id: &principal.tenant_id,
            resource_type: Some("ticket"),
            resource_id: Some(&path.id),
            details: Some(serde_json::json!({
                "status": { "from": existing.status, "to": input.status },
            })),
        },
    );

    let ticket = queries::get_ticket_in_tenant(&conn, &principal.tenant_id, &path.id)?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
    Ok(Json(ticket))
}

/// Completion callback from the workflow engine, authenticated by the
/// shared secret instead of a token. The tenant id arrives in the
/// payload and still scopes the mutation; a ticket in another tenant
/// reads as "not found" so the response never confirms its existence.
pub async fn ticket_done_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<TicketDoneRequest>,
) -> Result<Json<Ticket>> {
    let secret = headers
        .get("x-webhook-secret")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated("Unauthorized webhook".to_string()))?;
    if !crypto::secrets_match(secret, &state.webhook_secret) {
        return Err(AppError::Unauthenticated("Unauthorized webhook".to_string()));
    }

    let conn = state.db.get()?;
    let existing = queries::get_ticket_in_tenant(&conn, &input.tenant_id, &input.ticket_id)?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    queries::update_ticket_status(&conn, &input.tenant_id, &input.ticket_id, input.status)?;

    audit::record(
        &state,
        &headers,
        NewAuditLog {
            action: audit::TICKET_STATUS_UPDATED,
            user_id: audit::WEBHOOK_ACTOR,
            tenant_id: &input.tenant_id,
            resource_type: Some("ticket"),
            resource_id: Some(&input.ticket_id),
            details: Some(serde_json::json!({
                "status": { "from": existing.status, "to": input.status },
                "source": "webhook",
            })),
        },
    );

    let ticket = queries::get_ticket_in_tenant(&conn, &input.tenant_id, &input.ticket_id)?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
    Ok(Json(ticket))
}
