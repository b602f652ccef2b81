/// Shared domain value types used across the codebase

use serde::Serialize;
use std::fmt;

/// Caller-facing tenant identifier. Always trimmed and upper-cased so that
/// comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SiteCode(String);

impl SiteCode {
    /// Normalize a raw site code. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_ascii_uppercase()))
        }
    }

    /// Normalize an optional raw value, treating blank strings as absent.
    pub fn parse_opt(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observation topic. Closed set; anything else is rejected at validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    #[serde(rename = "Positive Reinforcement")]
    PositiveReinforcement,
    #[serde(rename = "At Risk Behavior")]
    AtRiskBehavior,
    #[serde(rename = "Not Following Policy")]
    NotFollowingPolicy,
    #[serde(rename = "Unsafe Condition")]
    UnsafeCondition,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::PositiveReinforcement,
        Topic::AtRiskBehavior,
        Topic::NotFollowingPolicy,
        Topic::UnsafeCondition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::PositiveReinforcement => "Positive Reinforcement",
            Topic::AtRiskBehavior => "At Risk Behavior",
            Topic::NotFollowingPolicy => "Not Following Policy",
            Topic::UnsafeCondition => "Unsafe Condition",
        }
    }

    /// Exact match against the display names.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.as_str() == raw)
    }

    /// Topics that do not require a named associate.
    pub fn allows_missing_associate(&self) -> bool {
        matches!(self, Topic::UnsafeCondition)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work shift, one of 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Shift(i16);

impl Shift {
    pub fn new(value: i64) -> Option<Self> {
        match value {
            1..=3 => Some(Self(value as i16)),
            _ => None,
        }
    }

    pub fn get(&self) -> i16 {
        self.0
    }
}

/// Placeholder stored when an unsafe-condition observation names nobody.
pub const ASSOCIATE_NOT_APPLICABLE: &str = "N/A";
