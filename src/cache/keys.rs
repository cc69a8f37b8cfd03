//! Cache key construction for active-advertisement queries.
//!
//! Keys list the present dimensions in a fixed order, `age`, `gender`, `country`,
//! `platform`, then `offset` and `limit`, which are always present. Each part is
//! `name:value` and parts are joined by `|`. Codes come from the allow-lists and never
//! contain either delimiter, so two filters share a key exactly when they are equal.

use std::fmt::Write as _;

use crate::domain::filter::ConsumerFilter;
use crate::domain::types::Dimension;

pub const ACTIVE_ADS_PREFIX: &str = "ads:active:";
const SEPARATOR: char = '|';

pub fn build_key(filter: &ConsumerFilter) -> String {
    let mut key = String::with_capacity(64);
    key.push_str(ACTIVE_ADS_PREFIX);

    let mut first = true;
    let mut part = |key: &mut String, name: &str, value: &dyn std::fmt::Display| {
        if !first {
            key.push(SEPARATOR);
        }
        first = false;
        // Writing into a String cannot fail.
        let _ = write!(key, "{name}:{value}");
    };

    if let Some(age) = filter.age {
        part(&mut key, "age", &age);
    }
    for dimension in Dimension::ALL {
        if let Some(code) = filter.code(dimension) {
            part(&mut key, dimension.as_str(), &code);
        }
    }
    part(&mut key, "offset", &filter.offset);
    part(&mut key, "limit", &filter.limit);

    key
}
