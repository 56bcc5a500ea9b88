//! CLI interface module
//!
//! 命令分发：config 子命令不需要数据库连接，其余命令先连接并执行迁移。

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::AnalyticsError;
use crate::storage::connect;
use commands::{config_generate, drop_analytics, run_populate};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ConfigError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ConfigError(msg) => {
                format!("{} {}", "Config error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<AnalyticsError> for CliError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Config(_) | AnalyticsError::DatabaseConfig(_) => {
                CliError::ConfigError(err.format_simple())
            }
            AnalyticsError::DatabaseConnection(_) | AnalyticsError::DatabaseOperation(_) => {
                CliError::StorageError(err.format_simple())
            }
            _ => CliError::CommandError(err.format_simple()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        // Generate doesn't need DB connection
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,
        Commands::Populate { days, seed, json } => {
            let db = connect(&config.database).await?;
            run_populate(&db, &config.fixtures, days, seed, json).await
        }
        Commands::Drop => {
            let db = connect(&config.database).await?;
            drop_analytics(&db, &config.fixtures).await
        }
    }
}
