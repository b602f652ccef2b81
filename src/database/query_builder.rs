//! SQL rendering for scoped filters. Every caller-provided value is bound,
//! never interpolated.

use sqlx::{Postgres, QueryBuilder};

use crate::filter::{ObservationFilter, SiteScope, UserFilter};

const OBSERVATION_SELECT: &str = "SELECT o.id, o.date, o.supervisor_name, o.shift, o.associate_name, \
     o.topic, o.action_addressed, o.site_id, s.code AS site_code \
     FROM observations o JOIN sites s ON s.id = o.site_id";

const USER_SELECT: &str = "SELECT u.id, u.name, u.is_supervisor, u.site_id, s.code AS site_code \
     FROM users u JOIN sites s ON s.id = u.site_id";

/// Tracks whether the next predicate opens the WHERE clause or extends it.
struct Conditions {
    started: bool,
}

impl Conditions {
    fn new() -> Self {
        Self { started: false }
    }

    fn next<'a>(&mut self, qb: &mut QueryBuilder<'a, Postgres>) {
        qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
    }
}

fn push_site_scope<'a>(qb: &mut QueryBuilder<'a, Postgres>, conditions: &mut Conditions, scope: &SiteScope) {
    if let SiteScope::Only(code) = scope {
        conditions.next(qb);
        qb.push("s.code = ").push_bind(code.as_str().to_string());
    }
}

pub fn select_observations(filter: &ObservationFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(OBSERVATION_SELECT);
    let mut conditions = Conditions::new();

    push_site_scope(&mut qb, &mut conditions, &filter.site);

    if let Some(name) = &filter.supervisor_name {
        conditions.next(&mut qb);
        qb.push("o.supervisor_name = ").push_bind(name.clone());
    }
    if let Some(from) = filter.date_from {
        conditions.next(&mut qb);
        qb.push("o.date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        conditions.next(&mut qb);
        qb.push("o.date <= ").push_bind(to);
    }

    qb.push(" ORDER BY o.date DESC, s.code COLLATE \"C\" ASC, o.id ASC");
    qb
}

pub fn select_users(filter: &UserFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(USER_SELECT);
    let mut conditions = Conditions::new();

    push_site_scope(&mut qb, &mut conditions, &filter.site);

    if let Some(flag) = filter.is_supervisor {
        conditions.next(&mut qb);
        qb.push("u.is_supervisor = ").push_bind(flag);
    }

    qb.push(" ORDER BY u.name COLLATE \"C\" ASC, s.code COLLATE \"C\" ASC, u.id ASC");
    qb
}
