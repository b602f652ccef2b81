use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
    Extension,
};

use super::query_rejected;
use crate::auth::Identity;
use crate::database::models::User;
use crate::error::ApiError;
use crate::filter::UserQuery;
use crate::server::AppState;
use crate::services;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<User>>, ApiError> {
    let Query(query) = query.map_err(query_rejected)?;
    Ok(Json(services::list_users(state.repo.as_ref(), &identity, &query).await?))
}
