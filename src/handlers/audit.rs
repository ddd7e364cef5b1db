use axum::extract::{Extension, State};

use crate::db::AppState;
use crate::db::queries;
use crate::error::Result;
use crate::extractors::{Json, Query};
use crate::jwt::Principal;
use crate::models::{AuditLogPage, AuditLogQuery};

/// Audit log for the caller's own tenant. The partition comes from the
/// verified principal; a client-supplied tenant filter is ignored.
pub async fn query_tenant_audit_logs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogPage>> {
    let conn = state.audit.get()?;
    let (entries, total) = queries::query_audit_logs(&conn, Some(&principal.tenant_id), &query)?;
    Ok(Json(AuditLogPage {
        pagination: query.pagination(total),
        entries,
    }))
}

/// Cross-tenant audit listing, admin only. `tenant` narrows the result
/// to one tenant; absent means all tenants.
pub async fn query_all_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogPage>> {
    let conn = state.audit.get()?;
    let (entries, total) = queries::query_audit_logs(&conn, query.tenant.as_deref(), &query)?;
    Ok(Json(AuditLogPage {
        pagination: query.pagination(total),
        entries,
    }))
}

#[derive(Debug, serde::Serialize)]
pub struct AuditLogStats {
    pub total_events: i64,
    pub recent_events: usize,
}

pub async fn audit_log_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AuditLogStats>> {
    let conn = state.audit.get()?;
    let recent = AuditLogQuery {
        limit: Some(10),
        ..Default::default()
    };
    let (entries, total) = queries::query_audit_logs(&conn, Some(&principal.tenant_id), &recent)?;
    Ok(Json(AuditLogStats {
        total_events: total,
        recent_events: entries.len(),
    }))
}
