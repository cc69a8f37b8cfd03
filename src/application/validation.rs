//! Input validation for producer conditions and consumer filters.
//!
//! Checks run in a fixed order and stop at the first failing field.

use std::sync::Arc;

use crate::application::allow_list::AllowListRegistry;
use crate::domain::entities::{NewAdvertisement, TargetingCondition};
use crate::domain::error::ValidationError;
use crate::domain::filter::{ConsumerFilter, MAX_AGE, MAX_LIMIT, MIN_AGE, MIN_LIMIT};
use crate::domain::types::Dimension;

#[derive(Debug, Clone)]
pub struct ConditionValidator {
    allow_list: Arc<AllowListRegistry>,
}

impl ConditionValidator {
    pub fn new(allow_list: Arc<AllowListRegistry>) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AllowListRegistry {
        &self.allow_list
    }

    pub fn validate_condition(&self, condition: &TargetingCondition) -> Result<(), ValidationError> {
        check_age("ageStart", condition.age_start)?;
        check_age("ageEnd", condition.age_end)?;

        if let (Some(start), Some(end)) = (condition.age_start, condition.age_end) {
            if start > end {
                return Err(ValidationError::invalid("ageEnd", "must be >= ageStart"));
            }
        }

        for dimension in Dimension::ALL {
            if let Some(code) = condition
                .codes(dimension)
                .iter()
                .find(|code| !self.allow_list.contains(dimension, code))
            {
                return Err(unknown_code(dimension, code));
            }
        }

        Ok(())
    }

    pub fn validate_consumer_filter(&self, filter: &ConsumerFilter) -> Result<(), ValidationError> {
        check_age("age", filter.age)?;

        for dimension in Dimension::ALL {
            match filter.code(dimension) {
                Some(code) if !self.allow_list.contains(dimension, code) => {
                    return Err(unknown_code(dimension, code));
                }
                _ => {}
            }
        }

        if filter.offset < 0 {
            return Err(ValidationError::invalid("offset", "must be >= 0"));
        }
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&filter.limit) {
            return Err(ValidationError::invalid(
                "limit",
                format!("must be {MIN_LIMIT} ~ {MAX_LIMIT}"),
            ));
        }

        Ok(())
    }

    /// Title, then time window, then each condition in submission order.
    pub fn validate_new_advertisement(&self, ad: &NewAdvertisement) -> Result<(), ValidationError> {
        if ad.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        if ad.start_at >= ad.end_at {
            return Err(ValidationError::invalid("endAt", "must be after startAt"));
        }
        ad.conditions
            .iter()
            .try_for_each(|condition| self.validate_condition(condition))
    }
}

fn check_age(name: &'static str, age: Option<i32>) -> Result<(), ValidationError> {
    match age {
        Some(age) if !(MIN_AGE..=MAX_AGE).contains(&age) => Err(ValidationError::invalid(
            name,
            format!("must be {MIN_AGE} ~ {MAX_AGE}"),
        )),
        _ => Ok(()),
    }
}

fn unknown_code(dimension: Dimension, code: &str) -> ValidationError {
    ValidationError::invalid(dimension.as_str(), format!("unknown code `{code}`"))
}
