use crate::auth::Identity;
use crate::database::models::User;
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::{scope_users, UserQuery};

/// Users visible to `identity`, ordered by name.
pub async fn list_users(repo: &dyn Repository, identity: &Identity, query: &UserQuery) -> Result<Vec<User>, ApiError> {
    let filter = scope_users(identity, query)?;
    Ok(repo.list_users(&filter).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::MemoryRepository;
    use crate::types::SiteCode;

    async fn seeded() -> MemoryRepository {
        let repo = MemoryRepository::new();
        for code in ["NORTH", "SOUTH"] {
            repo.create_site(&SiteCode::parse(code).unwrap()).await.unwrap();
        }
        for (name, supervisor, site) in [
            ("Riley Chen", true, "NORTH"),
            ("Avery Brooks", false, "NORTH"),
            ("Jordan Diaz", true, "SOUTH"),
            ("Casey Moore", true, "NORTH"),
        ] {
            repo.create_user(&NewUser {
                name: name.into(),
                is_supervisor: supervisor,
                site: SiteCode::parse(site).unwrap(),
            })
            .await
            .unwrap();
        }
        repo
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[tokio::test]
    async fn supervisors_in_own_site_only() {
        let repo = seeded().await;
        let query = UserQuery {
            is_supervisor: Some("true".into()),
            site_code: Some("SOUTH".into()),
        };
        let users = list_users(&repo, &Identity::member("north"), &query).await.unwrap();
        assert_eq!(names(&users), vec!["Casey Moore", "Riley Chen"]);
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let repo = seeded().await;
        let query = UserQuery {
            is_supervisor: Some("true".into()),
            site_code: None,
        };
        let identity = Identity::admin(None);
        let first = list_users(&repo, &identity, &query).await.unwrap();
        let second = list_users(&repo, &identity, &query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["Casey Moore", "Jordan Diaz", "Riley Chen"]);
    }

    #[tokio::test]
    async fn admin_may_pick_a_site() {
        let repo = seeded().await;
        let query = UserQuery {
            is_supervisor: None,
            site_code: Some("south".into()),
        };
        let users = list_users(&repo, &Identity::admin(Some("NORTH")), &query).await.unwrap();
        assert_eq!(names(&users), vec!["Jordan Diaz"]);
    }
}
