use serde::Serialize;
use sqlx::FromRow;

use crate::types::SiteCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Site {
    pub id: i32,
    pub code: String,
}

impl Site {
    pub fn site_ref(&self) -> SiteRef {
        SiteRef {
            code: self.code.clone(),
        }
    }

    pub fn is(&self, code: &SiteCode) -> bool {
        self.code == code.as_str()
    }
}

/// Site label embedded in user and observation records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRef {
    pub code: String,
}
