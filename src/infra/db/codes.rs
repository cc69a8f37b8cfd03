use async_trait::async_trait;

use crate::application::repos::{CodesRepo, RepoError};
use crate::domain::types::Dimension;

use super::{PostgresRepositories, map_sqlx_error};

fn codes_query(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Gender => "SELECT code FROM genders ORDER BY code",
        Dimension::Country => "SELECT code FROM countries ORDER BY code",
        Dimension::Platform => "SELECT code FROM platforms ORDER BY code",
    }
}

#[async_trait]
impl CodesRepo for PostgresRepositories {
    async fn all_codes(&self, dimension: Dimension) -> Result<Vec<String>, RepoError> {
        sqlx::query_scalar::<_, String>(codes_query(dimension))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}
