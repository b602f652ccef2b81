use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub max_request_size_bytes: usize,
}

/// Which request credential is authoritative for identity resolution.
/// Only one is honoured per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Verified bearer token or session cookie carrying `roles` and `metadata.site`.
    Token,
    /// Trusted `X-User-Site` / `X-User-Site-Admin` headers set by a fronting proxy.
    Headers,
}

impl IdentitySource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "token" | "jwt" => Some(IdentitySource::Token),
            "headers" | "header" => Some(IdentitySource::Headers),
            _ => None,
        }
    }
}

/// Signing secret, redacted from debug output.
#[derive(Clone, Default)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub identity_source: IdentitySource,
    pub jwt_secret: Secret,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub session_cookie: String,
    pub cors_origins: Vec<String>,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when IDENTITY_SOURCE=token")]
    MissingJwtSecret,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = env::var("OBSERVATION_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("IDENTITY_SOURCE") {
            match IdentitySource::parse(&v) {
                Some(source) => self.security.identity_source = source,
                None => tracing::warn!("Ignoring unknown IDENTITY_SOURCE '{}'", v),
            }
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = Secret::new(v);
        }
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.security.issuer = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("AUTH_AUDIENCE") {
            self.security.audience = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("AUTH_SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("ALLOWED_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    /// Checks that must hold before the server starts taking traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.identity_source == IdentitySource::Token && self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3001,
                max_request_size_bytes: 10 * 1024, // 10KB
            },
            security: SecurityConfig {
                identity_source: IdentitySource::Token,
                jwt_secret: Secret::default(),
                issuer: None,
                audience: None,
                session_cookie: "authorizer_token".to_string(),
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:3001".to_string()],
                jwt_expiry_hours: 24,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.security.cors_origins = vec![];
        config.security.jwt_expiry_hours = 8;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.security.cors_origins = vec![];
        config.security.jwt_expiry_hours = 1;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
