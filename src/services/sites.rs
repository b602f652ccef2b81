use crate::auth::Identity;
use crate::database::models::Site;
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::{scope_sites, SiteListing};

/// Admins see every site; everyone else sees only their own, if it exists.
pub async fn list_sites(repo: &dyn Repository, identity: &Identity) -> Result<Vec<Site>, ApiError> {
    match scope_sites(identity) {
        SiteListing::All => Ok(repo.list_sites().await?),
        SiteListing::Own(code) => Ok(repo.find_site(&code).await?.into_iter().collect()),
        SiteListing::Nothing => Ok(Vec::new()),
    }
}
