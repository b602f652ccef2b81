//! Tenant scoping for reads and writes.
//!
//! Every query the API runs is built from one of the filters here, and the
//! filters are only ever produced by [`scope`] from a resolved identity.

pub mod dates;
pub mod scope;
pub mod types;

pub use scope::{resolve_write_site, scope_observations, scope_sites, scope_users, write_target};
pub use types::*;
