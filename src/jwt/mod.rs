//! Tenant-bound access tokens.
//!
//! Tokens are stateless HS256 JWTs: there is no server-side revocation
//! list, so a leaked token stays valid until its two-hour expiry. Logout
//! is client-side token deletion.

use jwt_simple::prelude::*;

use crate::models::Role;

/// Token lifetime, fixed at issuance.
pub const TOKEN_TTL_HOURS: u64 = 2;

/// The authenticated identity for one request, decoded from a verified
/// token by the auth middleware. Never built from client-supplied fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
    pub tenant_id: String,
}

/// Verification failures. Callers must surface both variants to clients
/// identically; the distinction exists for diagnostics only.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed or carries a bad signature")]
    Invalid,
}

/// Build the signing key from the configured secret.
pub fn signing_key(secret: &str) -> HS256Key {
    HS256Key::from_bytes(secret.as_bytes())
}

/// Issue a signed token binding the principal to its tenant for
/// `TOKEN_TTL_HOURS` from now. Role and tenant are fixed at issuance.
pub fn issue(key: &HS256Key, principal: &Principal) -> anyhow::Result<String> {
    let claims =
        Claims::with_custom_claims(principal.clone(), Duration::from_hours(TOKEN_TTL_HOURS));
    key.authenticate(claims)
}

/// Check signature and expiry, returning the embedded principal.
pub fn verify(key: &HS256Key, token: &str) -> Result<Principal, TokenError> {
    let claims = key
        .verify_token::<Principal>(token, None)
        .map_err(classify)?;
    Ok(claims.custom)
}

fn classify(err: jwt_simple::Error) -> TokenError {
    match err.downcast_ref::<jwt_simple::JWTError>() {
        Some(jwt_simple::JWTError::TokenHasExpired) => TokenError::Expired,
        _ => TokenError::Invalid,
    }
}
