use axum::extract::{Extension, State};

use crate::db::AppState;
use crate::error::Result;
use crate::extractors::Json;
use crate::jwt::Principal;
use crate::registry::Screen;

#[derive(Debug, serde::Serialize)]
pub struct ScreensResponse {
    pub tenant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    pub screens: Vec<Screen>,
}

/// Screens registered for the caller's tenant. A tenant absent from the
/// registry gets an empty list, not an error.
pub async fn my_screens(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ScreensResponse>> {
    let response = match state.registry.tenant(&principal.tenant_id) {
        Some(config) => ScreensResponse {
            tenant: principal.tenant_id,
            tenant_name: Some(config.name.clone()),
            screens: config.screens.clone(),
        },
        None => ScreensResponse {
            tenant: principal.tenant_id,
            tenant_name: None,
            screens: Vec::new(),
        },
    };
    Ok(Json(response))
}
