//! Application services layer.

pub mod ads;
pub mod allow_list;
pub mod error;
pub mod query;
pub mod repos;
pub mod retrieval;
pub mod validation;
