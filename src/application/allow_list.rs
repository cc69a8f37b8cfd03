//! Valid categorical codes, loaded once before serving starts.

use std::collections::HashSet;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{CodesRepo, RepoError};
use crate::domain::types::Dimension;

#[derive(Debug, Error)]
#[error("failed to load `{dimension}` allow-list: {source}")]
pub struct RegistryLoadError {
    pub dimension: Dimension,
    #[source]
    pub source: RepoError,
}

/// Immutable allow-lists shared read-only across requests.
///
/// Codes added to the store after startup stay invisible until the process restarts.
#[derive(Debug, Clone, Default)]
pub struct AllowListRegistry {
    genders: HashSet<String>,
    countries: HashSet<String>,
    platforms: HashSet<String>,
}

impl AllowListRegistry {
    pub fn from_codes<G, C, P>(genders: G, countries: C, platforms: P) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            genders: genders.into_iter().map(Into::into).collect(),
            countries: countries.into_iter().map(Into::into).collect(),
            platforms: platforms.into_iter().map(Into::into).collect(),
        }
    }

    /// Query every dimension from the store. Any failure aborts the load.
    pub async fn load(repo: &dyn CodesRepo) -> Result<Self, RegistryLoadError> {
        let mut registry = Self::default();
        for dimension in Dimension::ALL {
            let codes = repo
                .all_codes(dimension)
                .await
                .map_err(|source| RegistryLoadError { dimension, source })?;
            *registry.set_mut(dimension) = codes.into_iter().collect();
        }

        info!(
            target = "admatch::allow_list",
            genders = registry.genders.len(),
            countries = registry.countries.len(),
            platforms = registry.platforms.len(),
            "Loaded allow-lists"
        );
        Ok(registry)
    }

    pub fn contains(&self, dimension: Dimension, code: &str) -> bool {
        self.set(dimension).contains(code)
    }

    pub fn len(&self, dimension: Dimension) -> usize {
        self.set(dimension).len()
    }

    fn set(&self, dimension: Dimension) -> &HashSet<String> {
        match dimension {
            Dimension::Gender => &self.genders,
            Dimension::Country => &self.countries,
            Dimension::Platform => &self.platforms,
        }
    }

    fn set_mut(&mut self, dimension: Dimension) -> &mut HashSet<String> {
        match dimension {
            Dimension::Gender => &mut self.genders,
            Dimension::Country => &mut self.countries,
            Dimension::Platform => &mut self.platforms,
        }
    }
}
