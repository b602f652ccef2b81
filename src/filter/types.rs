use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::database::models::{Observation, User};
use crate::types::SiteCode;

/// Which tenant partitions a query may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteScope {
    /// Every site. Only ever produced for admins.
    All,
    Only(SiteCode),
}

impl SiteScope {
    pub fn admits(&self, code: &str) -> bool {
        match self {
            SiteScope::All => true,
            SiteScope::Only(site) => site.as_str() == code,
        }
    }
}

/// Query string accepted by `GET /api/observations`, as sent by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationQuery {
    pub supervisor_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub site_code: Option<String>,
}

/// Query string accepted by `GET /api/users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub is_supervisor: Option<String>,
    pub site_code: Option<String>,
}

/// Authoritative observation predicate. All conditions are ANDed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationFilter {
    pub site: SiteScope,
    /// Exact supervisor name.
    pub supervisor_name: Option<String>,
    /// Inclusive lower bound, start of day UTC.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound, end of day UTC.
    pub date_to: Option<DateTime<Utc>>,
}

impl ObservationFilter {
    pub fn for_site(site: SiteScope) -> Self {
        Self {
            site,
            supervisor_name: None,
            date_from: None,
            date_to: None,
        }
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        self.site.admits(&observation.site.code)
            && self
                .supervisor_name
                .as_deref()
                .map_or(true, |name| observation.supervisor_name == name)
            && self.date_from.map_or(true, |from| observation.date >= from)
            && self.date_to.map_or(true, |to| observation.date <= to)
    }
}

/// Authoritative user predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub site: SiteScope,
    pub is_supervisor: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.site.admits(&user.site.code)
            && self.is_supervisor.map_or(true, |flag| user.is_supervisor == flag)
    }
}

/// What `GET /api/sites` may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteListing {
    All,
    Own(SiteCode),
    Nothing,
}
