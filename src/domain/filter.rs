//! Canonical consumer filter.

use serde::{Deserialize, Serialize};

use crate::domain::types::Dimension;

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 100;
pub const DEFAULT_LIMIT: i64 = 5;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_OFFSET: i64 = 0;

/// A consumer query after defaulting.
///
/// The consumer side carries a single value per dimension; `None` means the dimension is
/// not filtered. `offset` and `limit` are always present once defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsumerFilter {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub platform: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl Default for ConsumerFilter {
    fn default() -> Self {
        Self {
            age: None,
            gender: None,
            country: None,
            platform: None,
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ConsumerFilter {
    pub fn code(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Gender => self.gender.as_deref(),
            Dimension::Country => self.country.as_deref(),
            Dimension::Platform => self.platform.as_deref(),
        }
    }
}
