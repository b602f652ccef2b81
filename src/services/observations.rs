use chrono::NaiveDate;

use crate::auth::Identity;
use crate::database::models::Observation;
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::{resolve_write_site, scope_observations, ObservationQuery};
use crate::validation::{validate_observation, ObservationPayload};

/// Observations visible to `identity`, newest first.
pub async fn list_observations(
    repo: &dyn Repository,
    identity: &Identity,
    query: &ObservationQuery,
) -> Result<Vec<Observation>, ApiError> {
    let filter = scope_observations(identity, query)?;
    tracing::debug!("Listing observations with {:?}", filter);
    Ok(repo.list_observations(&filter).await?)
}

/// Validate and persist a new observation.
///
/// Field validation runs before any storage access, so a bad payload never
/// touches the repository. The target site is resolved afterwards and must
/// exist.
pub async fn create_observation(
    repo: &dyn Repository,
    identity: &Identity,
    payload: &ObservationPayload,
    today: NaiveDate,
) -> Result<Observation, ApiError> {
    let observation = validate_observation(payload, today).map_err(ApiError::validation)?;
    let site = resolve_write_site(repo, identity, payload.site_code()).await?;

    let created = repo.create_observation(&observation, &site).await?;
    tracing::info!("Created observation {} in site {}", created.id, site.code);
    Ok(created)
}
