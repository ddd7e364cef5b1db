//! File-backed tenant → screens registry.
//!
//! The registry file is owned by deployment tooling; this service loads
//! it once at startup and only ever reads it, keyed by the authenticated
//! principal's tenant id.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    pub name: String,
    pub url: String,
    pub scope: String,
    pub module: String,
    pub route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantScreens {
    pub name: String,
    pub screens: Vec<Screen>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenRegistry {
    #[serde(default)]
    tenants: HashMap<String, TenantScreens>,
}

impl ScreenRegistry {
    /// Load the registry file. A missing or invalid registry is not
    /// fatal: every tenant then resolves to an empty screen list.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(registry) => registry,
                Err(e) => {
                    tracing::warn!("registry file {} is invalid: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("registry file {} not readable: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn tenant(&self, tenant_id: &str) -> Option<&TenantScreens> {
        self.tenants.get(tenant_id)
    }
}
