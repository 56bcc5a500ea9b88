use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use analytics_populator::cli::Cli;
use analytics_populator::config::{
    DEFAULT_CONFIG_PATH, get_config, init_config_from, update_config,
};
use analytics_populator::interfaces::cli::run_cli_command;
use analytics_populator::system::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let mut cli = Cli::parse();

    // 优先级：命令行 > ENV > 配置文件 > 默认值
    let config = init_config_from(cli.config.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
        )
    })?;
    if let Some(database_url) = cli.database_url.take() {
        let mut overridden = (*config).clone();
        overridden.database.database_url = database_url;
        update_config(overridden);
    }
    let config = get_config();

    let log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    let command = cli.command_or_default();
    debug!("Running command: {:?}", command);

    if let Err(e) = run_cli_command(command, &config).await {
        error!("{}", e);
        eprintln!("{}", e.format_colored());
        // 退出前刷新日志
        drop(log_guard);
        std::process::exit(1);
    }

    Ok(())
}
