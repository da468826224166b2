use axum::middleware;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::admin;
use super::auth;
use super::health;
use super::keys;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Token exchange (no auth required for login)
        .nest("/auth", auth::create_auth_router())
        // Key-gated v1 API
        .nest("/v1", v1::create_v1_router())
        // Self-service key management (principal-gated)
        .route("/keys", get(keys::list_keys).post(keys::create_key))
        .route("/keys/{key_id}", get(keys::get_key))
        .route("/keys/{key_id}/revoke", post(keys::revoke_key))
        // Admin API
        .nest("/admin", admin::create_admin_router())
        // Add state and middleware
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
