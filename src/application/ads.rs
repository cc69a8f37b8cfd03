use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::query::{RawAdQuery, normalize};
use crate::application::repos::{AdsWriteRepo, RepoError};
use crate::application::retrieval::{CacheAsideRetriever, RetrievalError};
use crate::application::validation::ConditionValidator;
use crate::domain::entities::{Advertisement, NewAdvertisement};
use crate::domain::error::ValidationError;
use crate::domain::types::AdId;

#[derive(Debug, Error)]
pub enum AdServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Producer and consumer use cases over advertisements.
#[derive(Clone)]
pub struct AdService {
    writer: Arc<dyn AdsWriteRepo>,
    validator: ConditionValidator,
    retriever: CacheAsideRetriever,
}

impl AdService {
    pub fn new(
        writer: Arc<dyn AdsWriteRepo>,
        validator: ConditionValidator,
        retriever: CacheAsideRetriever,
    ) -> Self {
        Self {
            writer,
            validator,
            retriever,
        }
    }

    /// Validate and persist a new advertisement. Nothing is written when any part of the
    /// submission is invalid.
    pub async fn create(&self, ad: NewAdvertisement) -> Result<AdId, AdServiceError> {
        self.validator.validate_new_advertisement(&ad)?;

        let conditions = ad.conditions.len();
        let id = self.writer.insert_advertisement(ad).await?;

        info!(
            target = "admatch::ads",
            ad_id = %id,
            conditions,
            "Advertisement created"
        );
        Ok(id)
    }

    /// Active advertisements matching the consumer's profile, one page at a time.
    pub async fn list_active(
        &self,
        raw: RawAdQuery,
    ) -> Result<Vec<Advertisement>, AdServiceError> {
        let filter = normalize(raw);
        self.validator.validate_consumer_filter(&filter)?;
        Ok(self.retriever.retrieve(&filter).await?)
    }
}
