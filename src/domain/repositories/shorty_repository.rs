//! Repository trait for shorty data access.

use crate::domain::entities::{NewShorty, Shorty, ShortyFilter, ShortyPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Unique constraint guarding the short code. Implementations must surface
/// this name in the [`AppError::Conflict`] details of a colliding `create` so
/// the service can retry generation.
pub const UID_CONSTRAINT: &str = "shorties_uid_key";

/// Unique constraint guarding the target URL.
pub const URL_CONSTRAINT: &str = "shorties_url_key";

/// Repository interface for shorty records.
///
/// Uniqueness of `uid` and `url` is enforced here, by the storage engine's
/// atomic unique constraints; callers may pre-check for friendlier errors but
/// must treat the `create` outcome as authoritative.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortyRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortyRepository: Send + Sync {
    /// Persists a new record. Expired records holding the same `uid` or `url`
    /// are evicted as part of the same atomic operation, so only live records
    /// can collide.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] carrying the violated constraint name
    /// ([`UID_CONSTRAINT`] or [`URL_CONSTRAINT`]) on a duplicate, and
    /// [`AppError::Storage`] on other database errors.
    async fn create(&self, new_shorty: NewShorty) -> Result<Shorty, AppError>;

    /// Exact lookup by primary key.
    async fn find_by_id(&self, id: i64) -> Result<Option<Shorty>, AppError>;

    /// First record matching the filter, in creation order (ties broken by
    /// id) so results are deterministic for a fixed store state.
    async fn find_one(&self, filter: &ShortyFilter) -> Result<Option<Shorty>, AppError>;

    /// Live record (not yet expired) owning `url`, if any. Used as the
    /// duplicate-URL pre-check before creation.
    async fn find_live_by_url(&self, url: &str) -> Result<Option<Shorty>, AppError>;

    /// Records matching the filter, ordered by `created_at` ascending, with
    /// offset pagination.
    async fn list(
        &self,
        filter: &ShortyFilter,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Shorty>, AppError>;

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no record matches `id`, and
    /// [`AppError::Conflict`] when the patched `url` is already taken.
    async fn update(&self, id: i64, patch: ShortyPatch) -> Result<Shorty, AppError>;

    /// Removes the record with this id, returning it. `Ok(None)` when there
    /// is nothing to remove.
    async fn delete_by_id(&self, id: i64) -> Result<Option<Shorty>, AppError>;

    /// Removes the record matching both `uid` and `url`, returning it. The
    /// pair must match exactly; a correct `uid` with a different `url`
    /// removes nothing.
    async fn delete_by_pair(&self, uid: &str, url: &str) -> Result<Option<Shorty>, AppError>;

    /// Removes every record whose `expire_at` has passed, returning the
    /// number of purged rows. Called periodically by the expiration sweeper.
    async fn purge_expired(&self) -> Result<u64, AppError>;
}
