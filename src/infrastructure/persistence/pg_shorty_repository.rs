//! PostgreSQL implementation of the shorty repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShorty, Shorty, ShortyFilter, ShortyPatch};
use crate::domain::repositories::ShortyRepository;
use crate::error::AppError;
use serde_json::json;

const SHORTY_COLUMNS: &str = "id, uid, url, created_at, updated_at, expire_at";

/// PostgreSQL repository for shorty storage and retrieval.
///
/// Uniqueness of `uid` and `url` is guaranteed by the `shorties_uid_key` and
/// `shorties_url_key` constraints; duplicate writes surface as
/// [`AppError::Conflict`] carrying the constraint name.
pub struct PgShortyRepository {
    pool: Arc<PgPool>,
}

impl PgShortyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortyRepository for PgShortyRepository {
    async fn create(&self, new_shorty: NewShorty) -> Result<Shorty, AppError> {
        let mut tx = self.pool.begin().await?;

        // Expired rows are non-live: evict any that would collide so they
        // cannot block the insert. Postgres cannot express a time-bounded
        // partial unique index, so the eviction shares the transaction.
        sqlx::query("DELETE FROM shorties WHERE expire_at <= now() AND (uid = $1 OR url = $2)")
            .bind(&new_shorty.uid)
            .bind(&new_shorty.url)
            .execute(&mut *tx)
            .await?;

        let shorty = sqlx::query_as::<_, Shorty>(
            "INSERT INTO shorties (uid, url, expire_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, uid, url, created_at, updated_at, expire_at",
        )
        .bind(&new_shorty.uid)
        .bind(&new_shorty.url)
        .bind(new_shorty.expire_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(shorty)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Shorty>, AppError> {
        let shorty = sqlx::query_as::<_, Shorty>(&format!(
            "SELECT {SHORTY_COLUMNS} FROM shorties WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(shorty)
    }

    async fn find_one(&self, filter: &ShortyFilter) -> Result<Option<Shorty>, AppError> {
        let shorty = sqlx::query_as::<_, Shorty>(&format!(
            "SELECT {SHORTY_COLUMNS} FROM shorties \
             WHERE ($1::bigint IS NULL OR id = $1) \
               AND ($2::text IS NULL OR uid = $2) \
               AND ($3::text IS NULL OR url = $3) \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1"
        ))
        .bind(filter.id)
        .bind(filter.uid.as_deref())
        .bind(filter.url.as_deref())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(shorty)
    }

    async fn find_live_by_url(&self, url: &str) -> Result<Option<Shorty>, AppError> {
        let shorty = sqlx::query_as::<_, Shorty>(&format!(
            "SELECT {SHORTY_COLUMNS} FROM shorties \
             WHERE url = $1 AND expire_at > now() \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1"
        ))
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(shorty)
    }

    async fn list(
        &self,
        filter: &ShortyFilter,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Shorty>, AppError> {
        let shorties = sqlx::query_as::<_, Shorty>(&format!(
            "SELECT {SHORTY_COLUMNS} FROM shorties \
             WHERE ($1::bigint IS NULL OR id = $1) \
               AND ($2::text IS NULL OR uid = $2) \
               AND ($3::text IS NULL OR url = $3) \
             ORDER BY created_at ASC, id ASC \
             LIMIT $4 OFFSET $5"
        ))
        .bind(filter.id)
        .bind(filter.uid.as_deref())
        .bind(filter.url.as_deref())
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(shorties)
    }

    async fn update(&self, id: i64, patch: ShortyPatch) -> Result<Shorty, AppError> {
        let shorty = sqlx::query_as::<_, Shorty>(
            "UPDATE shorties \
             SET url = COALESCE($2::text, url), \
                 expire_at = COALESCE($3::timestamptz, expire_at), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, uid, url, created_at, updated_at, expire_at",
        )
        .bind(id)
        .bind(patch.url.as_deref())
        .bind(patch.expire_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        shorty.ok_or_else(|| AppError::not_found("Resource not found", json!({ "id": id })))
    }

    async fn delete_by_id(&self, id: i64) -> Result<Option<Shorty>, AppError> {
        let shorty = sqlx::query_as::<_, Shorty>(
            "DELETE FROM shorties WHERE id = $1 \
             RETURNING id, uid, url, created_at, updated_at, expire_at",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(shorty)
    }

    async fn delete_by_pair(&self, uid: &str, url: &str) -> Result<Option<Shorty>, AppError> {
        let shorty = sqlx::query_as::<_, Shorty>(
            "DELETE FROM shorties WHERE uid = $1 AND url = $2 \
             RETURNING id, uid, url, created_at, updated_at, expire_at",
        )
        .bind(uid)
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(shorty)
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM shorties WHERE expire_at <= now()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
