//! Outbound workflow notifications.

use serde_json::json;

use crate::db::AppState;
use crate::models::Ticket;

/// Tell the workflow engine a ticket was created, handing it the
/// callback URL and shared secret it needs to report completion.
///
/// Delivery runs on a detached task: a slow or failed notification
/// never delays or fails the ticket-creation response.
pub fn ticket_created(state: &AppState, ticket: &Ticket) {
    let Some(url) = state.workflow_webhook_url.clone() else {
        return;
    };
    let payload = json!({
        "ticketId": ticket.id,
        "tenantId": ticket.tenant_id,
        "callbackUrl": format!("{}/tickets/webhook/ticket-done", state.base_url),
        "webhookSecret": state.webhook_secret,
    });
    let client = state.http.clone();
    let ticket_id = ticket.id.clone();

    tokio::spawn(async move {
        match client.post(&url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    ticket_id,
                    "workflow notification rejected: {}",
                    response.status()
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(ticket_id, "workflow notification failed: {e}"),
        }
    });
}
