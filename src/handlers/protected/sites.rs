use axum::{extract::State, response::Json, Extension};

use crate::auth::Identity;
use crate::database::models::Site;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services;

/// GET /api/sites
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Site>>, ApiError> {
    Ok(Json(services::list_sites(state.repo.as_ref(), &identity).await?))
}
