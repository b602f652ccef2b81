//! Caller identity derived from request credentials.
//!
//! Exactly one credential source is honoured, chosen by
//! [`IdentitySource`]. In token mode the trust headers are ignored; in header
//! mode bearer tokens and cookies are ignored.

use axum::http::{header, HeaderMap};

use super::{token_fingerprint, verify_jwt, Role};
use crate::config::{IdentitySource, SecurityConfig};
use crate::error::ApiError;
use crate::types::SiteCode;

pub const SITE_HEADER: &str = "x-user-site";
pub const SITE_ADMIN_HEADER: &str = "x-user-site-admin";

/// Where the identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Bearer,
    Cookie,
    Headers,
}

/// Resolved, per-request caller identity. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub site: Option<SiteCode>,
    pub is_admin: bool,
    pub roles: Vec<Role>,
    pub credential: CredentialKind,
}

impl Identity {
    pub fn new(site: Option<SiteCode>, roles: Vec<Role>, credential: CredentialKind) -> Self {
        let is_admin = roles.contains(&Role::Admin);
        Self {
            site,
            is_admin,
            roles,
            credential,
        }
    }

    /// Site-bound regular user.
    pub fn member(site: &str) -> Self {
        Self::new(SiteCode::parse(site), vec![Role::User], CredentialKind::Bearer)
    }

    /// Admin, optionally with a home site.
    pub fn admin(site: Option<&str>) -> Self {
        Self::new(SiteCode::parse_opt(site), vec![Role::Admin], CredentialKind::Bearer)
    }

    /// Accounts still awaiting approval carry only the pending marker.
    pub fn is_pending_only(&self) -> bool {
        !self.roles.is_empty() && self.roles.iter().all(|role| *role == Role::Pending)
    }
}

/// Extract the caller's identity from request headers.
///
/// Fails with 401 when no credential is present or it does not verify.
/// A missing site claim is not an error here; the site guard decides that.
pub fn resolve_identity(headers: &HeaderMap, security: &SecurityConfig) -> Result<Identity, ApiError> {
    match security.identity_source {
        IdentitySource::Token => resolve_from_token(headers, security),
        IdentitySource::Headers => resolve_from_headers(headers),
    }
}

fn resolve_from_token(headers: &HeaderMap, security: &SecurityConfig) -> Result<Identity, ApiError> {
    let (token, credential) = extract_token(headers, &security.session_cookie)?
        .ok_or_else(ApiError::authentication_missing)?;

    let claims = verify_jwt(&token, security).map_err(|e| {
        tracing::info!("Rejected {:?} credential {}: {}", credential, token_fingerprint(&token), e);
        ApiError::from(e)
    })?;

    let identity = Identity::new(
        SiteCode::parse_opt(claims.metadata.site.as_deref()),
        claims.parsed_roles(),
        credential,
    );

    tracing::debug!(
        "Resolved identity for credential {}: site={:?} admin={}",
        token_fingerprint(&token),
        identity.site,
        identity.is_admin
    );

    Ok(identity)
}

fn resolve_from_headers(headers: &HeaderMap) -> Result<Identity, ApiError> {
    let site = header_text(headers, SITE_HEADER);
    let admin = header_text(headers, SITE_ADMIN_HEADER);

    if site.is_none() && admin.is_none() {
        return Err(ApiError::authentication_missing());
    }

    let is_admin = admin.map_or(false, |v| v.trim().eq_ignore_ascii_case("true"));
    let roles = if is_admin { vec![Role::Admin] } else { vec![Role::User] };

    Ok(Identity::new(SiteCode::parse_opt(site), roles, CredentialKind::Headers))
}

/// Bearer header first, then the session cookie.
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Result<Option<(String, CredentialKind)>, ApiError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token format"))?
            .trim();
        if token.is_empty() {
            return Err(ApiError::unauthorized("Empty bearer token"));
        }
        return Ok(Some((token.to_string(), CredentialKind::Bearer)));
    }

    Ok(session_cookie(headers, cookie_name).map(|token| (token, CredentialKind::Cookie)))
}

fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.trim_matches('"').to_string())
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
}
