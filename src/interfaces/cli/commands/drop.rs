//! Drop command

use colored::Colorize;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::config::FixturesConfig;
use crate::interfaces::cli::CliError;
use crate::populate::drop_all;

pub async fn drop_analytics(
    db: &DatabaseConnection,
    fixtures: &FixturesConfig,
) -> Result<(), CliError> {
    let txn = db
        .begin()
        .await
        .map_err(|e| CliError::StorageError(format!("Failed to begin transaction: {}", e)))?;

    let dropped = drop_all(&txn, &fixtures.realm_string_id).await?;

    txn.commit()
        .await
        .map_err(|e| CliError::StorageError(format!("Failed to commit transaction: {}", e)))?;

    println!(
        "{} Dropped {} analytics rows and fixture realm {}",
        "✓".bold().green(),
        dropped.to_string().cyan(),
        fixtures.realm_string_id.blue()
    );
    Ok(())
}
