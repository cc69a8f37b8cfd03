//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::types::{AdId, Dimension};

/// A persisted advertisement. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: AdId,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
}

/// One OR-branch of an advertisement's eligibility rule.
///
/// Every dimension is optional. An empty code set or a missing age bound places no
/// constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingCondition {
    pub age_start: Option<i32>,
    pub age_end: Option<i32>,
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl TargetingCondition {
    pub fn codes(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Gender => &self.genders,
            Dimension::Country => &self.countries,
            Dimension::Platform => &self.platforms,
        }
    }
}

/// An advertisement together with its conditions, as submitted by a producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdvertisement {
    pub title: String,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
    pub conditions: Vec<TargetingCondition>,
}
