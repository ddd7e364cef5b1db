use axum::extract::State;
use axum::http::HeaderMap;

use crate::audit;
use crate::crypto;
use crate::db::AppState;
use crate::db::queries::{self, NewAuditLog};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::jwt::{self, Principal};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let password_hash = crypto::hash_password(&input.password)?;

    let conn = state.db.get()?;
    let user = queries::create_user(
        &conn,
        &input.email,
        &password_hash,
        input.role,
        &input.tenant_id,
    )?;

    audit::record(
        &state,
        &headers,
        NewAuditLog {
            action: audit::USER_REGISTERED,
            user_id: &user.id,
            tenant_id: &user.tenant_id,
            resource_type: Some("user"),
            resource_id: Some(&user.id),
            details: Some(serde_json::json!({
                "email": user.email,
                "role": user.role,
            })),
        },
    );

    Ok(Json(RegisterResponse {
        message: "User created".to_string(),
        user_id: user.id,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = {
        let conn = state.db.get()?;
        queries::get_user_by_email(&conn, &input.email)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
    };

    if !crypto::verify_password(&input.password, &user.password_hash)? {
        audit::record(
            &state,
            &headers,
            NewAuditLog {
                action: audit::LOGIN_FAILED,
                user_id: &user.id,
                tenant_id: &user.tenant_id,
                resource_type: Some("authentication"),
                resource_id: None,
                details: Some(serde_json::json!({ "email": user.email })),
            },
        );
        return Err(AppError::Forbidden("Invalid password".to_string()));
    }

    let principal = Principal {
        user_id: user.id.clone(),
        role: user.role,
        tenant_id: user.tenant_id.clone(),
    };
    let token = jwt::issue(&state.token_key, &principal)?;

    audit::record(
        &state,
        &headers,
        NewAuditLog {
            action: audit::LOGIN_SUCCESS,
            user_id: &user.id,
            tenant_id: &user.tenant_id,
            resource_type: Some("authentication"),
            resource_id: None,
            details: Some(serde_json::json!({ "email": user.email })),
        },
    );

    Ok(Json(LoginResponse { token }))
}
