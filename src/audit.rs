//! Best-effort audit trail.
//!
//! Losing an audit entry is preferable to failing the action that
//! produced it, so failures here are logged and swallowed, never
//! surfaced to the caller.

use axum::http::HeaderMap;

use crate::db::AppState;
use crate::db::queries::{self, NewAuditLog};
use crate::util::extract_request_info;

// Action names recorded in the audit trail.
pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
pub const TICKET_CREATED: &str = "TICKET_CREATED";
pub const TICKET_STATUS_UPDATED: &str = "TICKET_STATUS_UPDATED";

/// Actor id recorded for secret-authenticated workflow callbacks.
pub const WEBHOOK_ACTOR: &str = "webhook";

/// Append one entry to the audit trail, attributing the client from
/// request headers.
pub fn record(state: &AppState, headers: &HeaderMap, entry: NewAuditLog<'_>) {
    if !state.audit_log_enabled {
        return;
    }
    let (ip_address, user_agent) = extract_request_info(headers);

    let conn = match state.audit.get() {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(action = entry.action, "audit entry dropped: {e}");
            return;
        }
    };
    if let Err(e) =
        queries::insert_audit_log(&conn, &entry, ip_address.as_deref(), user_agent.as_deref())
    {
        tracing::warn!(action = entry.action, "audit entry dropped: {e}");
    }
}
