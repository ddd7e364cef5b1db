//! Row → model mapping over fixed column lists.
//!
//! Each `*_COLS` constant and its `FromRow` impl must stay in sync; all
//! SELECTs go through these so column order is defined in one place.

use rusqlite::{Connection, Row, ToSql};

use crate::error::Result;
use crate::models::{AuditLog, Ticket, User};

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Parse a TEXT column into its enum, surfacing unexpected stored values
/// as a conversion error instead of a panic.
fn parse_text_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.get::<_, String>(idx)?.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub const USER_COLS: &str = "id, email, password_hash, role, tenant_id, created_at";

impl FromRow for User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            role: parse_text_column(row, 3)?,
            tenant_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub const TICKET_COLS: &str =
    "id, title, description, status, priority, tenant_id, created_by, created_at, updated_at";

impl FromRow for Ticket {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Ticket {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status: parse_text_column(row, 3)?,
            priority: parse_text_column(row, 4)?,
            tenant_id: row.get(5)?,
            created_by: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

pub const AUDIT_LOG_COLS: &str = "id, timestamp, action, user_id, tenant_id, resource_type, \
                                  resource_id, details, ip_address, user_agent";

impl FromRow for AuditLog {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let details: Option<String> = row.get(7)?;
        Ok(AuditLog {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            action: row.get(2)?,
            user_id: row.get(3)?,
            tenant_id: row.get(4)?,
            resource_type: row.get(5)?,
            resource_id: row.get(6)?,
            details: details.and_then(|s| serde_json::from_str(&s).ok()),
            ip_address: row.get(8)?,
            user_agent: row.get(9)?,
        })
    }
}

pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, |row| T::from_row(row))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
