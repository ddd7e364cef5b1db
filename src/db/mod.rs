use std::sync::Arc;

use anyhow::Result;
use jwt_simple::algorithms::HS256Key;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::registry::ScreenRegistry;

pub mod from_row;
pub mod queries;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Shared application state. Everything here is read-only after startup
/// or internally synchronized (the connection pools).
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Separate database holding the append-only audit trail.
    pub audit: DbPool,
    pub token_key: Arc<HS256Key>,
    pub webhook_secret: String,
    pub registry: Arc<ScreenRegistry>,
    pub http: reqwest::Client,
    /// Workflow-engine endpoint notified on ticket creation. None
    /// disables outbound notifications.
    pub workflow_webhook_url: Option<String>,
    /// Base URL external systems use to call back into this service.
    pub base_url: String,
    pub audit_log_enabled: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let db = create_pool(&config.database_path)?;
        let audit = create_pool(&config.audit_database_path)?;
        {
            let conn = db.get()?;
            init_db(&conn)?;
        }
        {
            let conn = audit.get()?;
            init_audit_db(&conn)?;
        }

        Ok(Self {
            db,
            audit,
            token_key: Arc::new(crate::jwt::signing_key(&config.jwt_secret)),
            webhook_secret: config.webhook_secret.clone(),
            registry: Arc::new(ScreenRegistry::load(&config.registry_path)),
            http: reqwest::Client::new(),
            workflow_webhook_url: Some(config.workflow_webhook_url.clone()),
            base_url: config.base_url.clone(),
            audit_log_enabled: config.audit_log_enabled,
        })
    }
}

pub fn create_pool(path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(path);
    Ok(r2d2::Pool::new(manager)?)
}

/// Create the application schema.
pub fn init_db(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            tenant_id TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tickets (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL,
            priority TEXT NOT NULL,
            tenant_id TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tickets_tenant
            ON tickets(tenant_id, created_at);
        ",
    )?;
    Ok(())
}

/// Create the audit schema. Append-only: the application inserts and
/// reads here but never updates or deletes.
pub fn init_audit_db(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS audit_logs (
            id TEXT PRIMARY KEY,
            timestamp INTEGER NOT NULL,
            action TEXT NOT NULL,
            user_id TEXT NOT NULL,
            tenant_id TEXT NOT NULL,
            resource_type TEXT,
            resource_id TEXT,
            details TEXT,
            ip_address TEXT,
            user_agent TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_audit_logs_tenant_time
            ON audit_logs(tenant_id, timestamp);
        ",
    )?;
    Ok(())
}
