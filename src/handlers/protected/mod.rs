// handlers/protected/mod.rs - site-scoped endpoints
//
// Every route here sits behind identity_middleware and site_guard_middleware,
// so handlers can take `Extension<Identity>` as given.

pub mod observations;
pub mod sites;
pub mod users;

use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::error::ApiError;

pub(crate) fn query_rejected(rejection: QueryRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

pub(crate) fn body_rejected(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}
