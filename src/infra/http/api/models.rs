use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::entities::{Advertisement, NewAdvertisement, TargetingCondition};
use crate::domain::types::AdId;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCreateRequest {
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    #[serde(default)]
    pub conditions: Vec<ConditionRequest>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRequest {
    pub age_start: Option<i32>,
    pub age_end: Option<i32>,
    #[serde(default)]
    pub gender: Vec<String>,
    #[serde(default)]
    pub country: Vec<String>,
    #[serde(default)]
    pub platform: Vec<String>,
}

impl From<ConditionRequest> for TargetingCondition {
    fn from(request: ConditionRequest) -> Self {
        Self {
            age_start: request.age_start,
            age_end: request.age_end,
            genders: request.gender,
            countries: request.country,
            platforms: request.platform,
        }
    }
}

impl From<AdCreateRequest> for NewAdvertisement {
    fn from(request: AdCreateRequest) -> Self {
        Self {
            title: request.title,
            start_at: request.start_at,
            end_at: request.end_at,
            conditions: request
                .conditions
                .into_iter()
                .map(TargetingCondition::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdCreatedResponse {
    pub id: AdId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdListResponse {
    pub items: Vec<AdListItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdListItem {
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
}

impl From<Advertisement> for AdListItem {
    fn from(ad: Advertisement) -> Self {
        Self {
            title: ad.title,
            end_at: ad.end_at,
        }
    }
}
