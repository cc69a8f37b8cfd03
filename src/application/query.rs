//! Normalization of raw consumer query input into a canonical filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use crate::domain::filter::{ConsumerFilter, DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Consumer query as received. Missing parameters and blank strings are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawAdQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
}

/// Apply defaults and drop blank codes. Present numeric values, zero included, are kept
/// as-is so validation can judge them.
pub fn normalize(raw: RawAdQuery) -> ConsumerFilter {
    ConsumerFilter {
        age: raw.age,
        gender: non_blank(raw.gender),
        country: non_blank(raw.country),
        platform: non_blank(raw.platform),
        offset: raw.offset.unwrap_or(DEFAULT_OFFSET),
        limit: raw.limit.unwrap_or(DEFAULT_LIMIT),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Query-string fields arrive as text; a present-but-empty value means "not specified".
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(de)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => FromStr::from_str(text).map_err(de::Error::custom).map(Some),
    }
}
