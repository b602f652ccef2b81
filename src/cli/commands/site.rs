use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{connect_repository, output_collection, output_success};
use crate::cli::OutputFormat;
use crate::database::{DatabaseManager, Repository};
use crate::types::SiteCode;

#[derive(Subcommand)]
pub enum SiteCommands {
    #[command(about = "Create a site")]
    Add {
        #[arg(help = "Site code (normalised to upper case)")]
        code: String,
    },

    #[command(about = "List all sites")]
    List,
}

pub async fn handle(cmd: SiteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let repo = connect_repository().await?;
    let result = execute(cmd, &repo, output_format).await;
    DatabaseManager::close(repo.pool().clone()).await;
    result
}

async fn execute(cmd: SiteCommands, repo: &dyn Repository, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SiteCommands::Add { code } => {
            let code = SiteCode::parse(&code).context("site code must not be blank")?;
            let site = repo.create_site(&code).await?;
            output_success(
                output_format,
                &format!("Created site {}", site.code),
                Some(json!({ "site": site })),
            )
        }
        SiteCommands::List => {
            let sites = repo.list_sites().await?;
            output_collection(output_format, "sites", &sites, "No sites configured", |site| {
                format!("{:<6} {}", site.id, site.code)
            })
        }
    }
}
