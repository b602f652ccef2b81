use serde::Serialize;
use sqlx::FromRow;

use super::site::SiteRef;
use crate::types::SiteCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub is_supervisor: bool,
    pub site_id: i32,
    pub site: SiteRef,
}

/// Flat row from `users JOIN sites`.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub is_supervisor: bool,
    pub site_id: i32,
    pub site_code: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_supervisor: row.is_supervisor,
            site_id: row.site_id,
            site: SiteRef { code: row.site_code },
        }
    }
}

/// Administrative user creation input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub is_supervisor: bool,
    pub site: SiteCode,
}
