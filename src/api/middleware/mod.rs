//! API middleware components

pub mod admin_auth;
pub mod auth;
pub mod logging;
pub mod user_auth;

pub use admin_auth::{AdminAuth, RequireAdmin};
pub use auth::{extract_api_key, failure_to_error, RequireApiKey, API_KEY_HEADER};
pub use logging::{client_addr, logging_middleware};
pub use user_auth::RequireUser;
