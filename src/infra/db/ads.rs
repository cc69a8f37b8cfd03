use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::application::repos::{AdsRepo, AdsWriteRepo, RepoError};
use crate::domain::entities::{Advertisement, NewAdvertisement};
use crate::domain::filter::ConsumerFilter;
use crate::domain::types::AdId;

use super::{PostgresRepositories, map_sqlx_error};

const FIND_ACTIVE_SQL: &str = r#"
    SELECT a.id, a.title, a.start_at, a.end_at
    FROM advertisements a
    WHERE a.start_at <= $1
      AND a.end_at >= $1
      AND (
        NOT EXISTS (
            SELECT 1 FROM targeting_conditions c WHERE c.advertisement_id = a.id
        )
        OR EXISTS (
            SELECT 1
            FROM targeting_conditions c
            WHERE c.advertisement_id = a.id
              AND ($2::int IS NULL OR (
                    (c.age_start IS NULL OR c.age_start <= $2)
                AND (c.age_end IS NULL OR c.age_end >= $2)
              ))
              AND ($3::text IS NULL OR cardinality(c.genders) = 0 OR $3 = ANY(c.genders))
              AND ($4::text IS NULL OR cardinality(c.countries) = 0 OR $4 = ANY(c.countries))
              AND ($5::text IS NULL OR cardinality(c.platforms) = 0 OR $5 = ANY(c.platforms))
        )
      )
    ORDER BY a.id ASC
    OFFSET $6
    LIMIT $7
"#;

#[derive(Debug, FromRow)]
struct AdvertisementRow {
    id: i64,
    title: String,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
}

impl From<AdvertisementRow> for Advertisement {
    fn from(row: AdvertisementRow) -> Self {
        Self {
            id: AdId(row.id),
            title: row.title,
            start_at: row.start_at,
            end_at: row.end_at,
        }
    }
}

impl PostgresRepositories {
    /// Active advertisements as of `now`; `find_active` passes the current time.
    pub async fn find_active_at(
        &self,
        filter: &ConsumerFilter,
        now: OffsetDateTime,
    ) -> Result<Vec<Advertisement>, RepoError> {
        let rows = sqlx::query_as::<_, AdvertisementRow>(FIND_ACTIVE_SQL)
            .bind(now)
            .bind(filter.age)
            .bind(filter.gender.as_deref())
            .bind(filter.country.as_deref())
            .bind(filter.platform.as_deref())
            .bind(filter.offset)
            .bind(filter.limit)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Advertisement::from).collect())
    }
}

#[async_trait]
impl AdsRepo for PostgresRepositories {
    async fn find_active(
        &self,
        filter: &ConsumerFilter,
    ) -> Result<Vec<Advertisement>, RepoError> {
        self.find_active_at(filter, OffsetDateTime::now_utc()).await
    }
}

#[async_trait]
impl AdsWriteRepo for PostgresRepositories {
    async fn insert_advertisement(&self, ad: NewAdvertisement) -> Result<AdId, RepoError> {
        let NewAdvertisement {
            title,
            start_at,
            end_at,
            conditions,
        } = ad;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO advertisements (title, start_at, end_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&title)
        .bind(start_at)
        .bind(end_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if !conditions.is_empty() {
            let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO targeting_conditions \
                 (advertisement_id, age_start, age_end, genders, countries, platforms) ",
            );
            qb.push_values(conditions, |mut row, condition| {
                row.push_bind(id)
                    .push_bind(condition.age_start)
                    .push_bind(condition.age_end)
                    .push_bind(condition.genders)
                    .push_bind(condition.countries)
                    .push_bind(condition.platforms);
            });
            qb.build()
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(AdId(id))
    }
}
