//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{Advertisement, NewAdvertisement};
use crate::domain::filter::ConsumerFilter;
use crate::domain::types::{AdId, Dimension};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait AdsRepo: Send + Sync {
    /// Active advertisements matching `filter`, ordered by id ascending, windowed by the
    /// filter's offset and limit.
    async fn find_active(&self, filter: &ConsumerFilter)
    -> Result<Vec<Advertisement>, RepoError>;
}

#[async_trait]
pub trait AdsWriteRepo: Send + Sync {
    /// Persist the advertisement and all of its conditions as one unit.
    async fn insert_advertisement(&self, ad: NewAdvertisement) -> Result<AdId, RepoError>;
}

#[async_trait]
pub trait CodesRepo: Send + Sync {
    async fn all_codes(&self, dimension: Dimension) -> Result<Vec<String>, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    /// Cheap round trip proving the store answers queries.
    async fn ping(&self) -> Result<(), RepoError>;
}
