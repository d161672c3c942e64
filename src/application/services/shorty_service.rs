//! Shorty lifecycle service: validation, uniqueness and CRUD orchestration.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::domain::entities::{NewShorty, Shorty, ShortyFilter, ShortyPatch};
use crate::domain::repositories::{ShortyRepository, UID_CONSTRAINT};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Records returned per page when the caller does not say otherwise.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Service owning the shorty resource lifecycle.
///
/// Creation validates the URL, pre-checks for a live duplicate, then inserts
/// with a fresh generated code, retrying a bounded number of times when the
/// code collides. The pre-check only buys a friendly error; the storage
/// layer's unique constraints are the authoritative guarantee, so concurrent
/// creations cannot commit the same code or URL.
pub struct ShortyService<R: ShortyRepository> {
    repository: Arc<R>,
    generator: CodeGenerator,
    default_ttl: Duration,
    max_code_attempts: usize,
}

impl<R: ShortyRepository> ShortyService<R> {
    /// Creates a new service.
    ///
    /// `default_ttl` is applied to `expire_at` on creation;
    /// `max_code_attempts` bounds the collision-retry loop.
    pub fn new(
        repository: Arc<R>,
        generator: CodeGenerator,
        default_ttl: Duration,
        max_code_attempts: usize,
    ) -> Self {
        Self {
            repository,
            generator,
            default_ttl,
            max_code_attempts,
        }
    }

    /// Creates a shorty for `url`.
    ///
    /// Order is fixed: validate the URL shape, check for a live record with
    /// the same URL, then generate-and-insert. Re-submitting an existing URL
    /// fails with [`AppError::Conflict`]; it never silently succeeds twice.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - empty or malformed URL
    /// - [`AppError::Conflict`] - URL already shortened (pre-check or insert)
    /// - [`AppError::ExhaustedRetries`] - no free code within the retry bound
    /// - [`AppError::Storage`] - other persistence failures
    pub async fn create(&self, url: &str) -> Result<Shorty, AppError> {
        let url = validate_url(url).map_err(|e| {
            AppError::bad_request("Invalid shorty URL", json!({ "reason": e.to_string() }))
        })?;

        if self.repository.find_live_by_url(&url).await?.is_some() {
            tracing::warn!(url, "Shorty resource already exists");
            return Err(AppError::conflict(
                "Resource already exists",
                json!({ "url": url }),
            ));
        }

        let expire_at = Utc::now() + self.default_ttl;

        for attempt in 1..=self.max_code_attempts {
            let uid = self.generator.next();
            let new_shorty = NewShorty {
                uid,
                url: url.clone(),
                expire_at,
            };

            match self.repository.create(new_shorty).await {
                Ok(shorty) => {
                    tracing::debug!(id = shorty.id, uid = %shorty.uid, "Created shorty resource");
                    return Ok(shorty);
                }
                Err(err) if err.constraint() == Some(UID_CONSTRAINT) => {
                    tracing::debug!(attempt, "Short code collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::exhausted_retries(
            "Could not allocate a unique short code",
            json!({ "attempts": self.max_code_attempts }),
        ))
    }

    /// Retrieves a shorty by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no record matches.
    pub async fn get_by_id(&self, id: i64) -> Result<Shorty, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found", json!({ "id": id })))
    }

    /// Retrieves the first shorty matching a field-equality filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty filter and
    /// [`AppError::NotFound`] when nothing matches.
    pub async fn find_one(&self, filter: &ShortyFilter) -> Result<Shorty, AppError> {
        if filter.is_empty() {
            return Err(AppError::bad_request(
                "At least one filter field is required",
                json!({ "supported": ["id", "uid", "url"] }),
            ));
        }

        self.repository
            .find_one(filter)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found", json!({})))
    }

    /// Lists shorties matching the filter, ordered by creation time.
    ///
    /// `limit` and `skip` fall back to defaults (100 and 0) when absent or
    /// non-positive; no upper bound is enforced.
    pub async fn list(
        &self,
        filter: &ShortyFilter,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<Shorty>, AppError> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIST_LIMIT);
        let skip = skip.filter(|s| *s >= 0).unwrap_or(0);

        self.repository.list(filter, limit, skip).await
    }

    /// Applies a partial update.
    ///
    /// Only `url` (re-validated) and `expire_at` can change; the short code
    /// is identity and stays untouched. An empty patch returns the record
    /// as-is.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - replacement URL fails the shape check
    /// - [`AppError::NotFound`] - no record matches `id`
    /// - [`AppError::Conflict`] - replacement URL already taken
    pub async fn update(&self, id: i64, patch: ShortyPatch) -> Result<Shorty, AppError> {
        let url = match patch.url {
            Some(url) => Some(validate_url(&url).map_err(|e| {
                AppError::bad_request("Invalid shorty URL", json!({ "reason": e.to_string() }))
            })?),
            None => None,
        };
        let patch = ShortyPatch {
            url,
            expire_at: patch.expire_at,
        };

        if patch.is_empty() {
            return self.get_by_id(id).await;
        }

        self.repository.update(id, patch).await
    }

    /// Removes a shorty by primary key, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when no record matches.
    pub async fn delete_by_id(&self, id: i64) -> Result<Shorty, AppError> {
        self.repository
            .delete_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found", json!({ "id": id })))
    }

    /// Removes the shorty matching both `uid` and `url` exactly, returning
    /// the removed record. Requiring the pair prevents accidental deletion by
    /// URL alone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the pair matches nothing.
    pub async fn delete_by_pair(&self, uid: &str, url: &str) -> Result<Shorty, AppError> {
        self.repository
            .delete_by_pair(uid, url)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Resource not found", json!({ "uid": uid, "url": url }))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortyRepository;
    use chrono::DateTime;

    const MAX_ATTEMPTS: usize = 10;

    fn service(repo: MockShortyRepository) -> ShortyService<MockShortyRepository> {
        ShortyService::new(
            Arc::new(repo),
            CodeGenerator::default(),
            Duration::days(1),
            MAX_ATTEMPTS,
        )
    }

    fn sample_shorty(id: i64, uid: &str, url: &str) -> Shorty {
        let now = Utc::now();
        Shorty {
            id,
            uid: uid.to_string(),
            url: url.to_string(),
            created_at: now,
            updated_at: now,
            expire_at: now + Duration::days(1),
        }
    }

    fn uid_conflict() -> AppError {
        AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": UID_CONSTRAINT }),
        )
    }

    #[tokio::test]
    async fn test_create_success() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url()
            .withf(|url| url == "http://example.com")
            .times(1)
            .returning(|_| Ok(None));

        repo.expect_create()
            .withf(|new_shorty| {
                new_shorty.url == "http://example.com" && new_shorty.uid.len() == 8
            })
            .times(1)
            .returning(|new_shorty| {
                let mut shorty = sample_shorty(1, &new_shorty.uid, &new_shorty.url);
                shorty.expire_at = new_shorty.expire_at;
                Ok(shorty)
            });

        let result = service(repo).create("http://example.com").await;

        let shorty = result.unwrap();
        assert_eq!(shorty.url, "http://example.com");
        assert_eq!(shorty.uid.len(), 8);

        let ttl = shorty.expire_at - Utc::now();
        assert!(ttl > Duration::hours(23) && ttl <= Duration::days(1));
    }

    #[tokio::test]
    async fn test_create_trims_url_before_validation() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url()
            .withf(|url| url == "http://example.com")
            .times(1)
            .returning(|_| Ok(None));

        repo.expect_create()
            .withf(|new_shorty| new_shorty.url == "http://example.com")
            .times(1)
            .returning(|new_shorty| Ok(sample_shorty(1, &new_shorty.uid, &new_shorty.url)));

        let result = service(repo).create("  http://example.com  ").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_invalid_url_never_touches_repository() {
        let mut repo = MockShortyRepository::new();
        repo.expect_find_live_by_url().times(0);
        repo.expect_create().times(0);

        let result = service(repo).create("not-a-url").await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_empty_url_is_validation_error() {
        let repo = MockShortyRepository::new();

        let result = service(repo).create("   ").await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_duplicate_url_is_conflict() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url()
            .times(1)
            .returning(|url| Ok(Some(sample_shorty(5, "existing1", url))));
        repo.expect_create().times(0);

        let result = service(repo).create("http://example.com").await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_retries_on_code_collision() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url().times(1).returning(|_| Ok(None));

        let mut calls = 0;
        repo.expect_create().times(2).returning(move |new_shorty| {
            calls += 1;
            if calls == 1 {
                Err(uid_conflict())
            } else {
                Ok(sample_shorty(1, &new_shorty.uid, &new_shorty.url))
            }
        });

        let result = service(repo).create("http://example.com").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_exhausts_retries_after_bound() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .times(MAX_ATTEMPTS)
            .returning(|_| Err(uid_conflict()));

        let result = service(repo).create("http://example.com").await;
        assert!(matches!(
            result.unwrap_err(),
            AppError::ExhaustedRetries { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_url_conflict_from_insert_is_not_retried() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url().times(1).returning(|_| Ok(None));
        // The concurrent-create race: the pre-check passed but the insert
        // lost to another writer on the url constraint.
        repo.expect_create().times(1).returning(|_| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": crate::domain::repositories::URL_CONSTRAINT }),
            ))
        });

        let result = service(repo).create("http://example.com").await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_storage_error_is_not_retried() {
        let mut repo = MockShortyRepository::new();

        repo.expect_find_live_by_url().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::storage("Database error", json!({}))));

        let result = service(repo).create("http://example.com").await;
        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut repo = MockShortyRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 99)
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repo).get_by_id(99).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_one_rejects_empty_filter() {
        let mut repo = MockShortyRepository::new();
        repo.expect_find_one().times(0);

        let result = service(repo).find_one(&ShortyFilter::default()).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_find_one_by_uid() {
        let mut repo = MockShortyRepository::new();
        repo.expect_find_one()
            .withf(|filter| filter.uid.as_deref() == Some("aZ3kQ9Lm"))
            .times(1)
            .returning(|_| Ok(Some(sample_shorty(7, "aZ3kQ9Lm", "http://example.com"))));

        let shorty = service(repo)
            .find_one(&ShortyFilter::by_uid("aZ3kQ9Lm"))
            .await
            .unwrap();
        assert_eq!(shorty.id, 7);
    }

    #[tokio::test]
    async fn test_list_applies_defaults() {
        let mut repo = MockShortyRepository::new();
        repo.expect_list()
            .withf(|filter, limit, skip| filter.is_empty() && *limit == 100 && *skip == 0)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let result = service(repo)
            .list(&ShortyFilter::default(), None, None)
            .await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_ignores_non_positive_limit_and_negative_skip() {
        let mut repo = MockShortyRepository::new();
        repo.expect_list()
            .withf(|_, limit, skip| *limit == 100 && *skip == 0)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let result = service(repo)
            .list(&ShortyFilter::default(), Some(0), Some(-3))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_passes_explicit_pagination() {
        let mut repo = MockShortyRepository::new();
        repo.expect_list()
            .withf(|_, limit, skip| *limit == 5 && *skip == 10)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let result = service(repo)
            .list(&ShortyFilter::default(), Some(5), Some(10))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_revalidates_url() {
        let mut repo = MockShortyRepository::new();
        repo.expect_update().times(0);

        let patch = ShortyPatch {
            url: Some("not-a-url".to_string()),
            expire_at: None,
        };
        let result = service(repo).update(1, patch).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let mut repo = MockShortyRepository::new();
        repo.expect_update()
            .withf(|id, patch| {
                *id == 1
                    && patch.url.as_deref() == Some("http://example.org")
                    && patch.expire_at.is_none()
            })
            .times(1)
            .returning(|id, patch| {
                Ok(sample_shorty(id, "aZ3kQ9Lm", patch.url.as_deref().unwrap()))
            });

        let patch = ShortyPatch {
            url: Some("http://example.org".to_string()),
            expire_at: None,
        };
        let shorty = service(repo).update(1, patch).await.unwrap();
        assert_eq!(shorty.url, "http://example.org");
        assert_eq!(shorty.uid, "aZ3kQ9Lm");
    }

    #[tokio::test]
    async fn test_update_empty_patch_returns_current_record() {
        let mut repo = MockShortyRepository::new();
        repo.expect_update().times(0);
        repo.expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample_shorty(id, "aZ3kQ9Lm", "http://example.com"))));

        let shorty = service(repo).update(1, ShortyPatch::default()).await.unwrap();
        assert_eq!(shorty.uid, "aZ3kQ9Lm");
    }

    #[tokio::test]
    async fn test_update_expire_at_only() {
        let new_expiry = DateTime::parse_from_rfc3339("2027-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut repo = MockShortyRepository::new();
        repo.expect_update()
            .withf(move |_, patch| patch.url.is_none() && patch.expire_at == Some(new_expiry))
            .times(1)
            .returning(|id, _| Ok(sample_shorty(id, "aZ3kQ9Lm", "http://example.com")));

        let patch = ShortyPatch {
            url: None,
            expire_at: Some(new_expiry),
        };
        assert!(service(repo).update(1, patch).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_id_not_found() {
        let mut repo = MockShortyRepository::new();
        repo.expect_delete_by_id().times(1).returning(|_| Ok(None));

        let result = service(repo).delete_by_id(1).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_by_pair_returns_removed_record() {
        let mut repo = MockShortyRepository::new();
        repo.expect_delete_by_pair()
            .withf(|uid, url| uid == "aZ3kQ9Lm" && url == "http://example.com")
            .times(1)
            .returning(|uid, url| Ok(Some(sample_shorty(3, uid, url))));

        let shorty = service(repo)
            .delete_by_pair("aZ3kQ9Lm", "http://example.com")
            .await
            .unwrap();
        assert_eq!(shorty.id, 3);
    }
}
