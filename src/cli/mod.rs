//! CLI module for Keygate
//!
//! Provides subcommands for running the gateway:
//! - `serve`: run the HTTP server (default)
//! - `seed`: create the initial admin account

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

/// Keygate - API key issuance and validation gateway
#[derive(Parser)]
#[command(name = "keygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Create the initial admin account
    Seed(seed::SeedArgs),
}
