//! Seed command - creates the initial admin account

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::account::AccountRole;
use crate::domain::DomainError;
use crate::infrastructure::account::RegisterAccountRequest;
use crate::infrastructure::logging;

/// Arguments for the seed command
#[derive(Args)]
pub struct SeedArgs {
    /// Email address of the admin account
    #[arg(long)]
    pub email: String,

    /// Password of the admin account
    #[arg(long)]
    pub password: String,
}

/// Create the initial admin account
pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    let state = crate::create_app_state(&config).await?;

    let request = RegisterAccountRequest {
        email: args.email.clone(),
        password: args.password,
        role: AccountRole::Admin,
        name: None,
        username: None,
    };

    match state.account_service.register(request, "127.0.0.1").await {
        Ok(account) => {
            info!(account_id = %account.id(), email = %account.email(),
                  "Admin account created");
            println!("Admin account created: {}", account.email());
            Ok(())
        }
        Err(DomainError::Conflict { .. }) => {
            println!("Admin account already exists: {}", args.email);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
