//! Pure eligibility rule shared by every store implementation.
//!
//! A condition is an AND across dimensions; within one dimension its codes are OR'd.
//! An advertisement is an OR across its conditions and matches unconditionally when it
//! has none. An absent filter value satisfies any constraint on that dimension, and an
//! absent constraint is satisfied by any filter value.

use time::OffsetDateTime;

use crate::domain::entities::{Advertisement, TargetingCondition};
use crate::domain::filter::ConsumerFilter;
use crate::domain::types::Dimension;

/// Inclusive on both ends of the window.
pub fn is_active(ad: &Advertisement, now: OffsetDateTime) -> bool {
    ad.start_at <= now && now <= ad.end_at
}

pub fn condition_matches(condition: &TargetingCondition, filter: &ConsumerFilter) -> bool {
    age_matches(condition, filter.age)
        && Dimension::ALL
            .into_iter()
            .all(|dimension| codes_match(condition.codes(dimension), filter.code(dimension)))
}

pub fn conditions_match(conditions: &[TargetingCondition], filter: &ConsumerFilter) -> bool {
    conditions.is_empty()
        || conditions
            .iter()
            .any(|condition| condition_matches(condition, filter))
}

pub fn advertisement_matches(
    ad: &Advertisement,
    conditions: &[TargetingCondition],
    filter: &ConsumerFilter,
    now: OffsetDateTime,
) -> bool {
    is_active(ad, now) && conditions_match(conditions, filter)
}

fn age_matches(condition: &TargetingCondition, age: Option<i32>) -> bool {
    let Some(age) = age else {
        return true;
    };
    condition.age_start.is_none_or(|start| start <= age)
        && condition.age_end.is_none_or(|end| age <= end)
}

fn codes_match(codes: &[String], value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(value) => codes.is_empty() || codes.iter().any(|code| code == value),
    }
}
