//! CLI command definitions and dispatch.

pub mod folder;
pub mod janitor;
pub mod pomodoro;
pub mod serve;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use studyhub_api::AppState;
use studyhub_core::config::AppConfig;
use studyhub_core::error::AppError;
use studyhub_database::DatabasePool;

/// StudyHub: study materials, planner and focus timer
#[derive(Debug, Parser)]
#[command(name = "studyhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the StudyHub server
    Serve(serve::ServeArgs),
    /// Materials folder management
    Folder(folder::FolderArgs),
    /// Deferred blob deletion and orphan cleanup
    Janitor(janitor::JanitorArgs),
    /// Mint a development bearer token
    Token(token::TokenArgs),
    /// Run a Pomodoro timer in the terminal
    Pomodoro(pomodoro::PomodoroArgs),
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self.command {
            Commands::Serve(_) => "info",
            _ => "warn",
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Folder(args) => folder::execute(args, &self.config, self.format).await,
            Commands::Janitor(args) => janitor::execute(args, &self.config, self.format).await,
            Commands::Token(args) => token::execute(args, &self.config).await,
            Commands::Pomodoro(args) => pomodoro::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: open the database and storage and wire the services.
pub async fn build_state(config: AppConfig) -> Result<(DatabasePool, AppState), AppError> {
    let db = DatabasePool::connect_and_migrate(&config.database).await?;
    let storage = studyhub_storage::build_provider(&config.storage).await?;
    let state = studyhub_api::build_state(config, &db, Arc::clone(&storage));
    Ok((db, state))
}
