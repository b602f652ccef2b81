//! In-process repository for tests and local runs without Postgres.
//!
//! Applies the same predicates and ordering as the SQL in
//! [`super::query_builder`], and counts every call so tests can assert that a
//! rejected request never reached storage.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewObservation, NewUser, Observation, Site, User};
use crate::database::repository::Repository;
use crate::filter::{ObservationFilter, UserFilter};
use crate::types::SiteCode;

#[derive(Default)]
struct MemoryState {
    sites: Vec<Site>,
    users: Vec<User>,
    observations: Vec<Observation>,
    next_id: i32,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Make every subsequent call fail as if storage were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    fn enter(&self) -> Result<(), DatabaseError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(DatabaseError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

fn observation_order(a: &Observation, b: &Observation) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.site.code.cmp(&b.site.code))
        .then_with(|| a.id.cmp(&b.id))
}

fn user_order(a: &User, b: &User) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.site.code.cmp(&b.site.code))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_site(&self, code: &SiteCode) -> Result<Option<Site>, DatabaseError> {
        self.enter()?;
        let state = self.state.read().await;
        Ok(state.sites.iter().find(|s| s.is(code)).cloned())
    }

    async fn list_sites(&self) -> Result<Vec<Site>, DatabaseError> {
        self.enter()?;
        let state = self.state.read().await;
        let mut sites = state.sites.clone();
        sites.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(sites)
    }

    async fn create_site(&self, code: &SiteCode) -> Result<Site, DatabaseError> {
        self.enter()?;
        let mut state = self.state.write().await;
        if state.sites.iter().any(|s| s.is(code)) {
            return Err(DatabaseError::Conflict(format!("site '{}' already exists", code)));
        }
        let site = Site {
            id: state.allocate_id(),
            code: code.as_str().to_string(),
        };
        state.sites.push(site.clone());
        Ok(site)
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, DatabaseError> {
        self.enter()?;
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.iter().filter(|u| filter.matches(u)).cloned().collect();
        users.sort_by(user_order);
        Ok(users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError> {
        self.enter()?;
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.name == user.name) {
            return Err(DatabaseError::Conflict(format!("user '{}' already exists", user.name)));
        }
        let site = state
            .sites
            .iter()
            .find(|s| s.is(&user.site))
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("site '{}'", user.site)))?;

        let created = User {
            id: state.allocate_id(),
            name: user.name.clone(),
            is_supervisor: user.is_supervisor,
            site_id: site.id,
            site: site.site_ref(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn list_observations(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, DatabaseError> {
        self.enter()?;
        let state = self.state.read().await;
        let mut observations: Vec<Observation> = state
            .observations
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        observations.sort_by(observation_order);
        Ok(observations)
    }

    async fn create_observation(&self, observation: &NewObservation, site: &Site) -> Result<Observation, DatabaseError> {
        self.enter()?;
        let mut state = self.state.write().await;
        if !state.sites.iter().any(|s| s.id == site.id) {
            return Err(DatabaseError::NotFound(format!("site id {}", site.id)));
        }

        let created = Observation {
            id: state.allocate_id(),
            date: observation.timestamp(),
            supervisor_name: observation.supervisor_name.clone(),
            shift: observation.shift,
            associate_name: observation.associate_name.clone(),
            topic: observation.topic,
            action_addressed: observation.action_addressed.clone(),
            site_id: site.id,
            site: site.site_ref(),
        };
        state.observations.push(created.clone());
        Ok(created)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.enter()
    }
}
