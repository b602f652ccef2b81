#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::net::TcpListener;

use observation_api::auth::{generate_jwt, Claims, Role};
use observation_api::config::{AppConfig, IdentitySource, Secret};
use observation_api::database::models::{NewObservation, NewUser, Site};
use observation_api::database::{MemoryRepository, Repository};
use observation_api::types::{Shift, SiteCode, Topic};
use observation_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "https://auth.example.test";
pub const TEST_AUDIENCE: &str = "observation-web";

/// A server running in-process on its own port, backed by a seeded
/// in-memory repository.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub repo: Arc<MemoryRepository>,
    pub config: Arc<AppConfig>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(IdentitySource::Token).await
    }

    pub async fn start_with(identity_source: IdentitySource) -> Result<Self> {
        let mut config = AppConfig::development();
        config.security.identity_source = identity_source;
        config.security.jwt_secret = Secret::new(TEST_SECRET);
        config.security.issuer = Some(TEST_ISSUER.to_string());
        config.security.audience = Some(TEST_AUDIENCE.to_string());
        let config = Arc::new(config);

        let repo = Arc::new(MemoryRepository::new());
        seed(repo.as_ref()).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let router = app(AppState::new(repo.clone(), config.clone()));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            repo,
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signed bearer token for the given roles and site.
    pub fn token(&self, roles: &[Role], site: Option<&str>) -> String {
        let claims = Claims::new(
            "integration-user",
            roles,
            site.map(str::to_string),
            chrono::Duration::hours(1),
        );
        generate_jwt(&claims, &self.config.security).expect("failed to sign test token")
    }

    pub fn member_token(&self, site: &str) -> String {
        self.token(&[Role::User], Some(site))
    }

    pub fn admin_token(&self, site: Option<&str>) -> String {
        self.token(&[Role::Admin], site)
    }

    pub async fn get_as(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post_as(&self, path: &str, token: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}

/// Three sites, a handful of users, and observations in NORTH and SOUTH.
///
/// NORTH: 2024-03-01, 2024-03-05 (Pat Lee), 2024-03-10
/// SOUTH: 2024-03-05 (Jordan Diaz)
/// EAST:  none
async fn seed(repo: &MemoryRepository) -> Result<()> {
    let north = site(repo, "NORTH").await?;
    let south = site(repo, "SOUTH").await?;
    site(repo, "EAST").await?;

    for (name, is_supervisor, code) in [
        ("Pat Lee", true, "NORTH"),
        ("Riley Chen", true, "NORTH"),
        ("Sam Ortiz", false, "NORTH"),
        ("Jordan Diaz", true, "SOUTH"),
        ("Avery Brooks", false, "SOUTH"),
    ] {
        repo.create_user(&NewUser {
            name: name.to_string(),
            is_supervisor,
            site: SiteCode::parse(code).context("site code")?,
        })
        .await?;
    }

    for (day, supervisor, site) in [
        (1, "Riley Chen", &north),
        (5, "Pat Lee", &north),
        (10, "Riley Chen", &north),
        (5, "Jordan Diaz", &south),
    ] {
        repo.create_observation(&observation(day, supervisor), site).await?;
    }

    Ok(())
}

async fn site(repo: &MemoryRepository, code: &str) -> Result<Site> {
    Ok(repo.create_site(&SiteCode::parse(code).context("site code")?).await?)
}

fn observation(day: u32, supervisor: &str) -> NewObservation {
    NewObservation {
        date: NaiveDate::from_ymd_opt(2024, 3, day).expect("valid seed date"),
        supervisor_name: supervisor.to_string(),
        shift: Shift::new(1).expect("valid shift"),
        associate_name: "Sam Ortiz".to_string(),
        topic: Topic::PositiveReinforcement,
        action_addressed: "Recognised safe lifting".to_string(),
    }
}

/// A valid observation body dated yesterday.
pub fn observation_body() -> serde_json::Value {
    let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
    serde_json::json!({
        "date": yesterday.format("%Y-%m-%d").to_string(),
        "supervisorName": "Pat Lee",
        "shift": 2,
        "associateName": "Sam Ortiz",
        "topic": "At Risk Behavior",
        "actionAddressed": "Reviewed ladder safety",
    })
}
