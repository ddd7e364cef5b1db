use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::db::AppState;
use crate::error::AppError;
use crate::jwt::{self, Principal};
use crate::util::extract_bearer_token;

/// Verify the bearer token and attach the decoded `Principal` to the
/// request. A missing header is 401; any verification failure is 403,
/// with expired and malformed tokens deliberately indistinguishable to
/// the client. A failed verification is never retried.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthenticated("Missing token".to_string()))?;

    let principal = jwt::verify(&state.token_key, token)
        .map_err(|_| AppError::Forbidden("Invalid token".to_string()))?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Require an ADMIN principal. Composes after `authenticate`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| AppError::Unauthenticated("Missing token".to_string()))?;

    if !principal.role.is_admin() {
        return Err(AppError::Forbidden("Admins only".to_string()));
    }
    Ok(next.run(request).await)
}
