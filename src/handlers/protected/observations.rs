use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    response::Json,
    Extension,
};

use super::{body_rejected, query_rejected};
use crate::auth::Identity;
use crate::database::models::Observation;
use crate::error::ApiError;
use crate::filter::ObservationQuery;
use crate::server::AppState;
use crate::services;
use crate::validation::ObservationPayload;

/// GET /api/observations
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    query: Result<Query<ObservationQuery>, QueryRejection>,
) -> Result<Json<Vec<Observation>>, ApiError> {
    let Query(query) = query.map_err(query_rejected)?;
    let observations = services::list_observations(state.repo.as_ref(), &identity, &query).await?;
    Ok(Json(observations))
}

/// POST /api/observations
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<ObservationPayload>, JsonRejection>,
) -> Result<Json<Observation>, ApiError> {
    let Json(payload) = payload.map_err(body_rejected)?;
    let today = chrono::Utc::now().date_naive();
    let created = services::create_observation(state.repo.as_ref(), &identity, &payload, today).await?;
    Ok(Json(created))
}
