//! Populate command

use colored::Colorize;
use sea_orm::DatabaseConnection;

use crate::config::FixturesConfig;
use crate::interfaces::cli::CliError;
use crate::populate::{PopulateOptions, populate};

pub async fn run_populate(
    db: &DatabaseConnection,
    fixtures: &FixturesConfig,
    days: Option<u32>,
    seed: Option<u64>,
    json: bool,
) -> Result<(), CliError> {
    let mut options = PopulateOptions::from_config(fixtures);
    if let Some(days) = days {
        options.days = days;
    }
    if let Some(seed) = seed {
        options.random_seed = seed;
    }

    if !json {
        println!(
            "{} {} days of data for realm {}",
            "Populating".yellow(),
            options.days.to_string().cyan(),
            options.realm_string_id.blue()
        );
    }

    let summary = populate(db, &options).await?;

    if json {
        let output = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::CommandError(format!("Failed to serialize summary: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    println!(
        "{} Inserted {} count rows",
        "✓".bold().green(),
        summary.total_count_rows().to_string().cyan()
    );
    println!("  realm_count:  {}", summary.realm_count_rows);
    println!("  user_count:   {}", summary.user_count_rows);
    println!("  stream_count: {}", summary.stream_count_rows);
    println!(
        "  {} realm={} user={} stream={} clients={}",
        "ids:".dimmed(),
        summary.realm_id,
        summary.user_id,
        summary.stream_id,
        summary.client_ids.len()
    );

    Ok(())
}
