//! Request orchestration: scope, validate, then hit the repository.
//!
//! Handlers stay thin and call into these; everything here is a function of
//! `(repository, identity, input)` so it can be driven directly from tests.

pub mod observations;
pub mod sites;
pub mod users;

pub use observations::{create_observation, list_observations};
pub use sites::list_sites;
pub use users::list_users;
