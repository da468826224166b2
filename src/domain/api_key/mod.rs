//! API Key domain - entities, verdicts, and repository traits

mod entity;
mod repository;
mod validation;
mod verdict;

pub use entity::{ApiKey, ApiKeyId, ApiKeyStatus};
pub use repository::ApiKeyRepository;
pub use validation::{validate_api_key_id, validate_key_name, ApiKeyValidationError};
pub use verdict::{AuthFailure, KeyGrant, Verdict};

#[cfg(test)]
pub use repository::mock::MockApiKeyRepository;
