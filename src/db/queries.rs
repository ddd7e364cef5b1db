use chrono::Utc;
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{AuditLog, AuditLogQuery, CreateTicket, Role, Ticket, TicketStatus, User};

use super::from_row::{AUDIT_LOG_COLS, TICKET_COLS, USER_COLS, query_all, query_one};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

// ============ Users ============

/// Create a user. A duplicate email surfaces as `Conflict` and leaves
/// no partial row behind.
pub fn create_user(
    conn: &Connection,
    email: &str,
    password_hash: &str,
    role: Role,
    tenant_id: &str,
) -> Result<User> {
    let id = gen_id();
    let created_at = now();

    let inserted = conn.execute(
        "INSERT INTO users (id, email, password_hash, role, tenant_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, email, password_hash, role.as_ref(), tenant_id, created_at],
    );

    match inserted {
        Ok(_) => Ok(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            tenant_id: tenant_id.to_string(),
            created_at,
        }),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::Conflict("Email already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

// ============ Tickets ============

/// Create a ticket in the given tenant partition, starting as pending.
pub fn create_ticket(
    conn: &Connection,
    tenant_id: &str,
    created_by: &str,
    input: &CreateTicket,
) -> Result<Ticket> {
    let id = gen_id();
    let ts = now();

    conn.execute(
        "INSERT INTO tickets (id, title, description, status, priority, tenant_id, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &id,
            &input.title,
            &input.description,
            TicketStatus::Pending.as_ref(),
            input.priority.as_ref(),
            tenant_id,
            created_by,
            ts,
            ts
        ],
    )?;

    Ok(Ticket {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        status: TicketStatus::Pending,
        priority: input.priority,
        tenant_id: tenant_id.to_string(),
        created_by: created_by.to_string(),
        created_at: ts,
        updated_at: ts,
    })
}

pub fn list_tickets_for_tenant(conn: &Connection, tenant_id: &str) -> Result<Vec<Ticket>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM tickets WHERE tenant_id = ?1 ORDER BY created_at DESC",
            TICKET_COLS
        ),
        &[&tenant_id],
    )
}

/// Fetch a ticket only if it belongs to the tenant. Absent and
/// other-tenant rows are indistinguishable to the caller.
pub fn get_ticket_in_tenant(
    conn: &Connection,
    tenant_id: &str,
    ticket_id: &str,
) -> Result<Option<Ticket>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM tickets WHERE id = ?1 AND tenant_id = ?2",
            TICKET_COLS
        ),
        &[&ticket_id, &tenant_id],
    )
}

/// Atomic status update keyed by id + tenant. The WHERE clause is the
/// sole concurrency guard between interactive and webhook writers.
pub fn update_ticket_status(
    conn: &Connection,
    tenant_id: &str,
    ticket_id: &str,
    status: TicketStatus,
) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE tickets SET status = ?1, updated_at = ?2 WHERE id = ?3 AND tenant_id = ?4",
        params![status.as_ref(), now(), ticket_id, tenant_id],
    )?;
    Ok(affected > 0)
}

// ============ Audit logs ============

/// A not-yet-persisted audit entry. Client attribution (IP, user agent)
/// is filled in by the recorder.
#[derive(Debug)]
pub struct NewAuditLog<'a> {
    pub action: &'a str,
    pub user_id: &'a str,
    pub tenant_id: &'a str,
    pub resource_type: Option<&'a str>,
    pub resource_id: Option<&'a str>,
    pub details: Option<serde_json::Value>,
}

pub fn insert_audit_log(
    conn: &Connection,
    entry: &NewAuditLog<'_>,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> Result<()> {
    let details = entry.details.as_ref().map(|d| d.to_string());

    conn.execute(
        "INSERT INTO audit_logs (id, timestamp, action, user_id, tenant_id, resource_type, resource_id, details, ip_address, user_agent)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            gen_id(),
            now(),
            entry.action,
            entry.user_id,
            entry.tenant_id,
            entry.resource_type,
            entry.resource_id,
            details,
            ip_address,
            user_agent
        ],
    )?;
    Ok(())
}

/// Query audit logs newest-first with AND-combined filters.
///
/// `tenant_id = None` means all tenants and is reserved for the admin
/// listing path; every other caller passes the principal's tenant.
pub fn query_audit_logs(
    conn: &Connection,
    tenant_id: Option<&str>,
    query: &AuditLogQuery,
) -> Result<(Vec<AuditLog>, i64)> {
    let mut where_clause = String::from("WHERE 1=1");
    let mut filters: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(tenant_id) = tenant_id {
        where_clause.push_str(" AND tenant_id = ?");
        filters.push(Box::new(tenant_id.to_string()));
    }
    if let Some(ref action) = query.action {
        where_clause.push_str(" AND action = ?");
        filters.push(Box::new(action.clone()));
    }
    if let Some(ref resource_type) = query.resource_type {
        where_clause.push_str(" AND resource_type = ?");
        filters.push(Box::new(resource_type.clone()));
    }
    if let Some(ref user_id) = query.user_id {
        where_clause.push_str(" AND user_id = ?");
        filters.push(Box::new(user_id.clone()));
    }
    if let Some(from) = query.from {
        where_clause.push_str(" AND timestamp >= ?");
        filters.push(Box::new(from));
    }
    if let Some(to) = query.to {
        where_clause.push_str(" AND timestamp <= ?");
        filters.push(Box::new(to));
    }

    let count_sql = format!("SELECT COUNT(*) FROM audit_logs {}", where_clause);
    let total: i64 = {
        let refs: Vec<&dyn rusqlite::ToSql> = filters.iter().map(|b| b.as_ref()).collect();
        conn.query_row(&count_sql, refs.as_slice(), |row| row.get(0))?
    };

    filters.push(Box::new(query.limit()));
    filters.push(Box::new(query.offset()));
    let select_sql = format!(
        "SELECT {} FROM audit_logs {} ORDER BY timestamp DESC, rowid DESC LIMIT ? OFFSET ?",
        AUDIT_LOG_COLS, where_clause
    );
    let refs: Vec<&dyn rusqlite::ToSql> = filters.iter().map(|b| b.as_ref()).collect();
    let entries = query_all(conn, &select_sql, refs.as_slice())?;

    Ok((entries, total))
}
