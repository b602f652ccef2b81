use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::site::SiteRef;
use crate::database::DatabaseError;
use crate::types::{Shift, Topic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub supervisor_name: String,
    pub shift: Shift,
    pub associate_name: String,
    pub topic: Topic,
    pub action_addressed: String,
    pub site_id: i32,
    pub site: SiteRef,
}

/// Flat row from `observations JOIN sites`.
#[derive(Debug, FromRow)]
pub struct ObservationRow {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub supervisor_name: String,
    pub shift: i16,
    pub associate_name: String,
    pub topic: String,
    pub action_addressed: String,
    pub site_id: i32,
    pub site_code: String,
}

impl TryFrom<ObservationRow> for Observation {
    type Error = DatabaseError;

    fn try_from(row: ObservationRow) -> Result<Self, Self::Error> {
        let shift = Shift::new(row.shift as i64)
            .ok_or_else(|| DatabaseError::Decode(format!("observation {} has shift {}", row.id, row.shift)))?;
        let topic = Topic::parse(&row.topic)
            .ok_or_else(|| DatabaseError::Decode(format!("observation {} has topic '{}'", row.id, row.topic)))?;

        Ok(Self {
            id: row.id,
            date: row.date,
            supervisor_name: row.supervisor_name,
            shift,
            associate_name: row.associate_name,
            topic,
            action_addressed: row.action_addressed,
            site_id: row.site_id,
            site: SiteRef { code: row.site_code },
        })
    }
}

/// A validated observation ready to persist. The target site is resolved
/// separately and passed alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewObservation {
    pub date: NaiveDate,
    pub supervisor_name: String,
    pub shift: Shift,
    pub associate_name: String,
    pub topic: Topic,
    pub action_addressed: String,
}

impl NewObservation {
    /// Stored instant: midnight UTC of the calendar day.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }
}
