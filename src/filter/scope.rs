use super::dates::{end_of_day, parse_calendar_date, start_of_day};
use super::types::{ObservationFilter, ObservationQuery, SiteListing, SiteScope, UserFilter, UserQuery};
use crate::auth::Identity;
use crate::database::models::Site;
use crate::database::Repository;
use crate::error::{ApiError, FieldError};
use crate::types::SiteCode;

/// Site visibility for a read.
///
/// Non-admins are pinned to their own site whatever they ask for. Admins get
/// the site they ask for, or every site when they ask for none.
fn read_scope(identity: &Identity, requested_site: Option<&str>) -> Result<SiteScope, ApiError> {
    if identity.is_admin {
        return Ok(SiteCode::parse_opt(requested_site).map_or(SiteScope::All, SiteScope::Only));
    }

    if let Some(requested) = SiteCode::parse_opt(requested_site) {
        if identity.site.as_ref() != Some(&requested) {
            tracing::debug!("Ignoring site filter '{}' from non-admin caller", requested);
        }
    }

    identity
        .site
        .clone()
        .map(SiteScope::Only)
        .ok_or_else(ApiError::site_unresolved)
}

/// Build the authoritative observation predicate for a caller.
pub fn scope_observations(identity: &Identity, query: &ObservationQuery) -> Result<ObservationFilter, ApiError> {
    let mut errors = Vec::new();

    let date_from = parse_bound(query.start_date.as_deref(), "startDate", "Invalid start date format", &mut errors)
        .map(start_of_day);
    let date_to = parse_bound(query.end_date.as_deref(), "endDate", "Invalid end date format", &mut errors)
        .map(end_of_day);

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let supervisor_name = query
        .supervisor_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Ok(ObservationFilter {
        site: read_scope(identity, query.site_code.as_deref())?,
        supervisor_name,
        date_from,
        date_to,
    })
}

fn parse_bound(
    raw: Option<&str>,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<chrono::NaiveDate> {
    let raw = raw.filter(|v| !v.trim().is_empty())?;
    let parsed = parse_calendar_date(raw);
    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }
    parsed
}

/// Build the authoritative user predicate for a caller.
pub fn scope_users(identity: &Identity, query: &UserQuery) -> Result<UserFilter, ApiError> {
    let is_supervisor = match query.is_supervisor.as_deref().map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    };

    Ok(UserFilter {
        site: read_scope(identity, query.site_code.as_deref())?,
        is_supervisor,
    })
}

/// Which sites a caller may list.
pub fn scope_sites(identity: &Identity) -> SiteListing {
    if identity.is_admin {
        SiteListing::All
    } else {
        identity.site.clone().map_or(SiteListing::Nothing, SiteListing::Own)
    }
}

/// Site code a write lands in.
///
/// Non-admin callers always write to their own site; a site code in the
/// payload is ignored. Admins may name a target, falling back to their own.
pub fn write_target(identity: &Identity, requested_site: Option<&str>) -> Result<SiteCode, ApiError> {
    if !identity.is_admin {
        if SiteCode::parse_opt(requested_site).is_some() {
            tracing::debug!("Ignoring payload siteCode from non-admin caller");
        }
        return identity.site.clone().ok_or_else(ApiError::site_unresolved);
    }

    SiteCode::parse_opt(requested_site)
        .or_else(|| identity.site.clone())
        .ok_or_else(|| {
            ApiError::validation(vec![FieldError::new(
                "siteCode",
                "Site code is required for admin users without a home site",
            )])
        })
}

/// Resolve the write target to an existing site record.
pub async fn resolve_write_site(
    repo: &dyn Repository,
    identity: &Identity,
    requested_site: Option<&str>,
) -> Result<Site, ApiError> {
    let code = write_target(identity, requested_site)?;
    repo.find_site(&code).await?.ok_or_else(|| {
        tracing::info!("Write rejected: site '{}' does not exist", code);
        ApiError::invalid_site()
    })
}
