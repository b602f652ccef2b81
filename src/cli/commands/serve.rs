use clap::Args;

use crate::config;
use crate::server::{self, Storage};

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, help = "Keep data in memory instead of Postgres (lost on exit)")]
    pub in_memory: bool,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }

    let storage = if args.in_memory { Storage::InMemory } else { Storage::Postgres };
    server::run(config, storage).await?;
    Ok(())
}
