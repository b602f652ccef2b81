use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{connect_repository, output_success};
use crate::cli::OutputFormat;
use crate::database::models::NewUser;
use crate::database::{DatabaseManager, Repository};
use crate::types::SiteCode;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user in a site")]
    Add {
        #[arg(help = "Full name (unique)")]
        name: String,

        #[arg(long, help = "Site code the user belongs to")]
        site: String,

        #[arg(long, help = "Mark the user as a supervisor")]
        supervisor: bool,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { name, site, supervisor } => {
            let user = parse_new_user(name, site, supervisor)?;

            let repo = connect_repository().await?;
            let result = add(&user, &repo, output_format).await;
            DatabaseManager::close(repo.pool().clone()).await;
            result
        }
    }
}

fn parse_new_user(name: String, site: String, supervisor: bool) -> anyhow::Result<NewUser> {
    let name = name.trim().to_string();
    anyhow::ensure!(!name.is_empty(), "user name must not be blank");
    let site = SiteCode::parse(&site).context("site code must not be blank")?;
    Ok(NewUser {
        name,
        is_supervisor: supervisor,
        site,
    })
}

async fn add(user: &NewUser, repo: &dyn Repository, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = repo.create_user(user).await?;
    output_success(
        output_format,
        &format!("Created user {} in {}", user.name, user.site.code),
        Some(json!({ "user": user })),
    )
}
