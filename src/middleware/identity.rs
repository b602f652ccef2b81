use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::resolve_identity;
use crate::error::ApiError;
use crate::server::AppState;

/// Resolve the caller's identity and attach it to the request.
///
/// Rejects with 401 before any handler runs, so a request without a usable
/// credential never reaches the repository.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = resolve_identity(request.headers(), &state.config.security)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
