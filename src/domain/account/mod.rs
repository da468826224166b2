//! Account domain - entities and repository traits

mod entity;
mod oracle;
mod repository;
mod validation;

pub use entity::{Account, AccountId, AccountRole, AccountStatus};
pub use oracle::{AccountGate, AccountStatusOracle};
pub use repository::AccountRepository;
pub use validation::{
    validate_account_id, validate_email, validate_password, AccountValidationError,
};

#[cfg(test)]
pub use oracle::mock::MockAccountStatusOracle;
#[cfg(test)]
pub use repository::mock::MockAccountRepository;
