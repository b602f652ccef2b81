pub mod headers;
pub mod identity;
pub mod redact;
pub mod site_guard;

pub use headers::{cors_layer, with_response_headers};
pub use identity::identity_middleware;
pub use redact::redact_internal_errors;
pub use site_guard::{require_site, site_guard_middleware};
