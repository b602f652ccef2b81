use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, Role};
use crate::cli::OutputFormat;
use crate::config;
use crate::types::SiteCode;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, default_value = "dev-user", help = "Token subject")]
    pub subject: String,

    #[arg(long, help = "Site code carried in metadata.site")]
    pub site: Option<String>,

    #[arg(long, conflicts_with = "pending", help = "Grant the admin role")]
    pub admin: bool,

    #[arg(long, help = "Issue a pending (unapproved) account token")]
    pub pending: bool,

    #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

impl TokenArgs {
    fn roles(&self) -> Vec<Role> {
        if self.pending {
            vec![Role::Pending]
        } else if self.admin {
            vec![Role::Admin, Role::User]
        } else {
            vec![Role::User]
        }
    }
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;

    let site = match args.site.as_deref() {
        Some(raw) => Some(SiteCode::parse(raw).context("site code must not be blank")?),
        None => None,
    };
    let hours = args.hours.unwrap_or(security.jwt_expiry_hours);
    let ttl = chrono::Duration::hours(i64::try_from(hours).context("token lifetime too large")?);

    let roles = args.roles();
    let claims = Claims::new(&args.subject, &roles, site.as_ref().map(|s| s.as_str().to_string()), ttl);
    let token = generate_jwt(&claims, security).context("failed to sign token (is JWT_SECRET set?)")?;

    match output_format {
        OutputFormat::Json => {
            let body = json!({
                "token": token,
                "subject": claims.sub,
                "roles": claims.roles,
                "site": claims.metadata.site,
                "expires_at": claims.exp,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
