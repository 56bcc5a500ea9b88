//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Populate the analytics tables with synthetic demo data
#[derive(Parser)]
#[command(name = "populate-analytics-db")]
#[command(version)]
#[command(about = "Populate the analytics tables with synthetic demo data", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Override database URL from configuration
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Drop existing analytics data and insert synthetic counts (default)
    Populate {
        /// Number of days of data to generate
        #[arg(long)]
        days: Option<u32>,

        /// Random seed for the generated noise
        #[arg(long)]
        seed: Option<u64>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop analytics data and fixture entities without repopulating
    Drop,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// 未指定子命令时执行 populate
    pub fn command_or_default(&mut self) -> Commands {
        self.command.take().unwrap_or(Commands::Populate {
            days: None,
            seed: None,
            json: false,
        })
    }
}
