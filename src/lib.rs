//! Targeted advertisement service.
//!
//! Producers register advertisements with audience-targeting conditions; consumers fetch
//! the active advertisements matching their profile through a cache-aside read path.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
