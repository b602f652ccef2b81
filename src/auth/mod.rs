use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod identity;

pub use identity::{resolve_identity, CredentialKind, Identity};

/// Claims issued by the identity provider. Only `roles` and `metadata.site`
/// drive authorization; the rest is carried for logging and expiry checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub metadata: ClaimsMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimsMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, roles: &[Role], site: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            metadata: ClaimsMetadata { site },
            email: None,
        }
    }

    /// Recognized roles, deduplicated. Unknown role strings are dropped.
    pub fn parsed_roles(&self) -> Vec<Role> {
        let mut roles = Vec::new();
        for raw in &self.roles {
            match Role::parse(raw) {
                Some(role) if !roles.contains(&role) => roles.push(role),
                Some(_) => {}
                None => tracing::debug!("Ignoring unrecognized role '{}'", raw),
            }
        }
        roles
    }
}

/// Role markers understood by the authorization layer. Matching is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    Pending,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Pending => "pending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            "pending" => Some(Role::Pending),
            _ => None,
        }
    }
}

/// Token verification failures. Messages are safe to return to clients.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token issuer is not accepted")]
    WrongIssuer,

    #[error("Token audience is not accepted")]
    WrongAudience,

    #[error("Token signing is not configured")]
    SecretNotConfigured,

    #[error("Token generation failed: {0}")]
    Generation(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::WrongIssuer,
            ErrorKind::InvalidAudience => AuthError::WrongAudience,
            _ => AuthError::Malformed,
        }
    }
}

/// Verify a signed token against the configured secret, issuer and audience.
pub fn verify_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.expose().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);
    match &security.issuer {
        Some(issuer) => validation.set_issuer(&[issuer]),
        None => validation.iss = None,
    }
    match &security.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

#[derive(Serialize)]
struct SignedClaims<'a> {
    #[serde(flatten)]
    claims: &'a Claims,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a str>,
}

/// Sign claims with the configured secret, stamping issuer and audience.
/// Used by the admin CLI to mint development tokens.
pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }

    let signed = SignedClaims {
        claims,
        iss: security.issuer.as_deref(),
        aud: security.audience.as_deref(),
    };
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.expose().as_bytes());

    encode(&Header::new(Algorithm::HS256), &signed, &encoding_key)
        .map_err(|e| AuthError::Generation(e.to_string()))
}

/// Short, non-reversible tag for correlating a credential in logs.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{:x}", digest).chars().take(12).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Secret};

    fn security() -> SecurityConfig {
        let mut config = AppConfig::development().security;
        config.jwt_secret = Secret::new("unit-test-secret");
        config.issuer = Some("https://auth.example.test".to_string());
        config.audience = Some("observation-web".to_string());
        config
    }

    #[test]
    fn round_trips_roles_and_site() {
        let security = security();
        let claims = Claims::new("alice", &[Role::Admin], Some("north".to_string()), Duration::hours(1));
        let token = generate_jwt(&claims, &security).unwrap();

        let verified = verify_jwt(&token, &security).unwrap();
        assert_eq!(verified.sub, "alice");
        assert_eq!(verified.parsed_roles(), vec![Role::Admin]);
        assert_eq!(verified.metadata.site.as_deref(), Some("north"));
    }

    #[test]
    fn distinguishes_expired_from_malformed() {
        let security = security();
        let claims = Claims::new("bob", &[Role::User], None, Duration::hours(-2));
        let token = generate_jwt(&claims, &security).unwrap();

        assert_eq!(verify_jwt(&token, &security).unwrap_err(), AuthError::Expired);
        assert_eq!(verify_jwt("not-a-token", &security).unwrap_err(), AuthError::Malformed);
    }

    #[test]
    fn rejects_foreign_issuer_and_audience() {
        let security = security();
        let claims = Claims::new("carol", &[Role::User], None, Duration::hours(1));
        let token = generate_jwt(&claims, &security).unwrap();

        let mut other_issuer = security.clone();
        other_issuer.issuer = Some("https://evil.example.test".to_string());
        assert_eq!(verify_jwt(&token, &other_issuer).unwrap_err(), AuthError::WrongIssuer);

        let mut other_audience = security.clone();
        other_audience.audience = Some("someone-else".to_string());
        assert_eq!(verify_jwt(&token, &other_audience).unwrap_err(), AuthError::WrongAudience);

        let mut other_secret = security;
        other_secret.jwt_secret = Secret::new("different");
        assert_eq!(verify_jwt(&token, &other_secret).unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn role_parsing_is_exact() {
        let mut claims = Claims::new("dave", &[], None, Duration::hours(1));
        claims.roles = vec![
            "admin".into(),
            "site-admin".into(),
            "Admin".into(),
            "pending".into(),
            "admin".into(),
        ];
        assert_eq!(claims.parsed_roles(), vec![Role::Admin, Role::Pending]);
    }

    #[test]
    fn fingerprint_hides_token() {
        let fp = token_fingerprint("secret-token-material");
        assert_eq!(fp.len(), 12);
        assert!(!fp.contains("secret"));
        assert_eq!(fp, token_fingerprint("secret-token-material"));
    }
}
