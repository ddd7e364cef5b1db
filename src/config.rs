use std::env;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub audit_database_path: String,
    pub registry_path: String,
    /// Base URL external systems use to call back into this service.
    pub base_url: String,
    /// Secret used to sign and verify access tokens. Required.
    pub jwt_secret: String,
    /// Shared secret expected on inbound workflow callbacks. Required.
    pub webhook_secret: String,
    /// Workflow-engine endpoint notified when a ticket is created. Required.
    pub workflow_webhook_url: String,
    /// Enable/disable audit logging entirely
    pub audit_log_enabled: bool,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// Fails fast when a required secret is absent: a silent fallback
    /// would leave every deployment signing tokens with the same value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let audit_log_enabled = env::var("AUDIT_LOG_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Ok(Self {
            jwt_secret: required("JWT_SECRET")?,
            webhook_secret: required("WEBHOOK_SECRET")?,
            workflow_webhook_url: required("WORKFLOW_WEBHOOK_URL")?,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "flowdesk.db".to_string()),
            audit_database_path: env::var("AUDIT_DATABASE_PATH")
                .unwrap_or_else(|_| "flowdesk_audit.db".to_string()),
            registry_path: env::var("REGISTRY_PATH")
                .unwrap_or_else(|_| "registry.json".to_string()),
            host,
            port,
            base_url,
            audit_log_enabled,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} environment variable is required"))
}
