use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewObservation, NewUser, Observation, Site, User};
use crate::filter::{ObservationFilter, UserFilter};
use crate::types::SiteCode;

/// Persistence operations. Every read takes an already-scoped filter; the
/// repository never decides tenant visibility itself.
///
/// Ordering contract:
/// - sites by `code` ascending
/// - users by `name` ascending, then site code ascending
/// - observations by `date` descending, then site code ascending
///
/// Text keys compare byte-wise (`COLLATE "C"` in SQL), so "Zed" sorts
/// before "alice" whatever the database locale. Ties beyond those keys fall
/// back to `id` ascending so repeated reads are stable.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn find_site(&self, code: &SiteCode) -> Result<Option<Site>, DatabaseError>;

    async fn list_sites(&self) -> Result<Vec<Site>, DatabaseError>;

    async fn create_site(&self, code: &SiteCode) -> Result<Site, DatabaseError>;

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, DatabaseError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError>;

    async fn list_observations(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, DatabaseError>;

    /// Single-statement insert into `site`.
    async fn create_observation(&self, observation: &NewObservation, site: &Site) -> Result<Observation, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
