use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{ApiError, InternalErrorDetail};
use crate::server::AppState;

/// Replace internal error bodies with the opaque message in production.
/// The detail has already been logged where the error was raised.
pub async fn redact_internal_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if state.config.is_production() && response.extensions().get::<InternalErrorDetail>().is_some() {
        return ApiError::opaque_internal().into_response();
    }
    response
}
