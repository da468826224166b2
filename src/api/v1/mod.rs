//! Key-gated v1 API endpoints

pub mod resource;
pub mod users;
pub mod validate;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/validate", get(validate::validate_key))
        .route("/users/{user_id}", get(users::get_user))
        .route("/resource", get(resource::get_resource))
}
