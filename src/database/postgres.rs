use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewObservation, NewUser, Observation, ObservationRow, Site, User, UserRow};
use crate::database::query_builder::{select_observations, select_users};
use crate::database::repository::Repository;
use crate::filter::{ObservationFilter, UserFilter};
use crate::types::SiteCode;

/// Postgres-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn find_site(&self, code: &SiteCode) -> Result<Option<Site>, DatabaseError> {
        let site = sqlx::query_as::<_, Site>("SELECT id, code FROM sites WHERE code = $1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(site)
    }

    async fn list_sites(&self) -> Result<Vec<Site>, DatabaseError> {
        let sites = sqlx::query_as::<_, Site>("SELECT id, code FROM sites ORDER BY code COLLATE \"C\" ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(sites)
    }

    async fn create_site(&self, code: &SiteCode) -> Result<Site, DatabaseError> {
        sqlx::query_as::<_, Site>("INSERT INTO sites (code) VALUES ($1) RETURNING id, code")
            .bind(code.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, format!("site '{}' already exists", code)))
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, DatabaseError> {
        let mut qb = select_users(filter);
        let rows = qb.build_query_as::<UserRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let site = self
            .find_site(&user.site)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("site '{}'", user.site)))?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO users (name, is_supervisor, site_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.name)
        .bind(user.is_supervisor)
        .bind(site.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("user '{}' already exists", user.name)))?;

        Ok(User {
            id,
            name: user.name.clone(),
            is_supervisor: user.is_supervisor,
            site_id: site.id,
            site: site.site_ref(),
        })
    }

    async fn list_observations(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, DatabaseError> {
        let mut qb = select_observations(filter);
        let rows = qb.build_query_as::<ObservationRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Observation::try_from).collect()
    }

    async fn create_observation(&self, observation: &NewObservation, site: &Site) -> Result<Observation, DatabaseError> {
        let date = observation.timestamp();
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO observations \
             (date, supervisor_name, shift, associate_name, topic, action_addressed, site_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(date)
        .bind(&observation.supervisor_name)
        .bind(observation.shift.get())
        .bind(&observation.associate_name)
        .bind(observation.topic.as_str())
        .bind(&observation.action_addressed)
        .bind(site.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Observation {
            id,
            date,
            supervisor_name: observation.supervisor_name.clone(),
            shift: observation.shift,
            associate_name: observation.associate_name.clone(),
            topic: observation.topic,
            action_addressed: observation.action_addressed.clone(),
            site_id: site.id,
            site: site.site_ref(),
        })
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
