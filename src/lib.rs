pub mod audit;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod registry;
pub mod util;

use axum::routing::{get, patch, post};
use axum::{Router, middleware as axum_middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::AppState;
use crate::middleware::{authenticate, require_admin};

/// Assemble the full application router.
///
/// Three tiers: public routes (registration, login, the secret-guarded
/// workflow callback), token-authenticated routes, and the admin-only
/// cross-tenant audit listing.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route(
            "/tickets/webhook/ticket-done",
            post(handlers::ticket_done_webhook),
        );

    let authenticated = Router::new()
        .route("/me/screens", get(handlers::my_screens))
        .route(
            "/tickets",
            post(handlers::create_ticket).get(handlers::list_tickets),
        )
        .route("/tickets/{id}/status", patch(handlers::update_ticket_status))
        .route("/audit", get(handlers::query_tenant_audit_logs))
        .route("/audit/stats", get(handlers::audit_log_stats))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    let admin = Router::new()
        .route("/audit/admin/all", get(handlers::query_all_audit_logs))
        .layer(axum_middleware::from_fn(require_admin))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    public
        .merge(authenticated)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
