//! CLI module for bball-manager
//!
//! Provides subcommands for:
//! - `serve`: run the HTTP API
//! - `seed`: recreate the schema and insert the demo roster
//! - `token`: mint a development bearer token

pub mod seed;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// bball-manager - role-gated teams and players API
#[derive(Parser)]
#[command(name = "bball-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Drop and recreate the tables, then insert the demo roster
    Seed,

    /// Print a signed development token
    Token(token::TokenArgs),
}

/// Load `.env` and layered configuration, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    Ok(config)
}
