use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::Identity;
use crate::error::ApiError;

/// Gate for site-scoped routes.
///
/// Pending-only accounts are refused outright. Non-admins must carry a site;
/// admins may omit one.
pub fn require_site(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_pending_only() {
        return Err(ApiError::forbidden("Account pending approval"));
    }
    if !identity.is_admin && identity.site.is_none() {
        tracing::warn!("Rejecting non-admin caller without a site");
        return Err(ApiError::site_unresolved());
    }
    Ok(())
}

/// Runs after [`super::identity_middleware`].
pub async fn site_guard_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .ok_or_else(ApiError::authentication_missing)?;

    require_site(identity)?;
    Ok(next.run(request).await)
}
