use anyhow::Context;

use crate::cli::utils::{connect_repository, output_success};
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let repo = connect_repository().await?;
    let migrated = DatabaseManager::migrate(repo.pool())
        .await
        .context("failed to apply migrations");
    DatabaseManager::close(repo.pool().clone()).await;
    migrated?;

    output_success(output_format, "Migrations applied", None)
}
