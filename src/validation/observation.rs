use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::database::models::NewObservation;
use crate::error::FieldError;
use crate::filter::dates::parse_calendar_date;
use crate::types::{Shift, Topic, ASSOCIATE_NOT_APPLICABLE};

/// Raw `POST /api/observations` body. Fields stay loosely typed so that
/// every problem can be reported at once instead of failing on the first
/// type mismatch during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPayload {
    pub date: Option<Value>,
    pub supervisor_name: Option<Value>,
    pub shift: Option<Value>,
    pub associate_name: Option<Value>,
    pub topic: Option<Value>,
    pub action_addressed: Option<Value>,
    /// Target site, honoured for admins only.
    pub site_code: Option<Value>,
}

impl ObservationPayload {
    pub fn site_code(&self) -> Option<&str> {
        text(&self.site_code)
    }
}

fn text(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Trimmed non-empty text, or `None`.
fn required_text(value: &Option<Value>) -> Option<String> {
    text(value)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_shift(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Check every field of an observation submission.
///
/// `today` is the server's current UTC date; observations dated after it are
/// rejected. On failure, every violated constraint is returned.
pub fn validate_observation(payload: &ObservationPayload, today: NaiveDate) -> Result<NewObservation, Vec<FieldError>> {
    let mut errors = Vec::new();

    let date = match &payload.date {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("date", "Date is required"));
            None
        }
        Some(value) => match value.as_str().and_then(parse_calendar_date) {
            Some(date) if date > today => {
                errors.push(FieldError::new("date", "Date cannot be in the future"));
                None
            }
            Some(date) => Some(date),
            None => {
                errors.push(FieldError::new("date", "Invalid date format"));
                None
            }
        },
    };

    let supervisor_name = required_text(&payload.supervisor_name);
    if supervisor_name.is_none() {
        errors.push(FieldError::new("supervisorName", "Supervisor name is required"));
    }

    let shift = match &payload.shift {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("shift", "Shift is required"));
            None
        }
        Some(value) => {
            let shift = parse_shift(value).and_then(Shift::new);
            if shift.is_none() {
                errors.push(FieldError::new("shift", "Shift must be 1, 2, or 3"));
            }
            shift
        }
    };

    let topic = match required_text(&payload.topic) {
        None => {
            errors.push(FieldError::new("topic", "Topic is required"));
            None
        }
        Some(raw) => {
            let topic = Topic::parse(&raw);
            if topic.is_none() {
                let allowed: Vec<_> = Topic::ALL.iter().map(Topic::as_str).collect();
                errors.push(FieldError::new(
                    "topic",
                    format!("Topic must be one of: {}", allowed.join(", ")),
                ));
            }
            topic
        }
    };

    let associate_name = match required_text(&payload.associate_name) {
        Some(name) => Some(name),
        None if topic.map_or(false, |t| t.allows_missing_associate()) => Some(ASSOCIATE_NOT_APPLICABLE.to_string()),
        None => {
            errors.push(FieldError::new(
                "associateName",
                "Associate name is required for non-Unsafe Condition topics",
            ));
            None
        }
    };

    let action_addressed = required_text(&payload.action_addressed);
    if action_addressed.is_none() {
        errors.push(FieldError::new("actionAddressed", "Action addressed is required"));
    }

    match (date, supervisor_name, shift, associate_name, topic, action_addressed) {
        (Some(date), Some(supervisor_name), Some(shift), Some(associate_name), Some(topic), Some(action_addressed))
            if errors.is_empty() =>
        {
            Ok(NewObservation {
                date,
                supervisor_name,
                shift,
                associate_name,
                topic,
                action_addressed,
            })
        }
        _ => Err(errors),
    }
}
