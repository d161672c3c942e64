//! Shorty entity: the persisted URL ↔ short-code mapping.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::json;

/// A shortened URL record.
///
/// `uid` is the generated short code; both `uid` and `url` are unique among
/// live records. `expire_at` marks when the record becomes eligible for the
/// background sweep.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Shorty {
    pub id: i64,
    pub uid: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
}

impl Shorty {
    /// Returns true once `expire_at` has passed; such a record no longer
    /// counts as live for uniqueness purposes.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expire_at
    }
}

/// Input data for creating a new shorty.
#[derive(Debug, Clone)]
pub struct NewShorty {
    pub uid: String,
    pub url: String,
    pub expire_at: DateTime<Utc>,
}

/// Partial update for an existing shorty.
///
/// Only `url` and `expire_at` can be replaced; `uid` is identity and is never
/// reassigned. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ShortyPatch {
    pub url: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
}

impl ShortyPatch {
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.expire_at.is_none()
    }
}

/// Field-equality filter over shorty records.
///
/// Set fields are combined with AND. The filterable field set is closed;
/// [`from_pairs`](Self::from_pairs) rejects anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortyFilter {
    pub id: Option<i64>,
    pub uid: Option<String>,
    pub url: Option<String>,
}

impl ShortyFilter {
    pub fn by_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            ..Self::default()
        }
    }

    pub fn by_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.uid.is_none() && self.url.is_none()
    }

    /// Builds a filter from string key/value pairs, as supplied by the
    /// request layer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown field name or a
    /// non-numeric `id` value.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();

        for (key, value) in pairs {
            match key {
                "id" => {
                    let id = value.parse::<i64>().map_err(|_| {
                        AppError::bad_request(
                            "Filter field 'id' must be numeric",
                            json!({ "id": value }),
                        )
                    })?;
                    filter.id = Some(id);
                }
                "uid" => filter.uid = Some(value.to_string()),
                "url" => filter.url = Some(value.to_string()),
                other => {
                    return Err(AppError::bad_request(
                        "Unsupported filter field",
                        json!({ "field": other, "supported": ["id", "uid", "url"] }),
                    ));
                }
            }
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_shorty(expire_at: DateTime<Utc>) -> Shorty {
        let now = Utc::now();
        Shorty {
            id: 1,
            uid: "aZ3kQ9Lm".to_string(),
            url: "http://example.com".to_string(),
            created_at: now,
            updated_at: now,
            expire_at,
        }
    }

    #[test]
    fn test_shorty_not_expired_before_expire_at() {
        let shorty = sample_shorty(Utc::now() + Duration::days(1));
        assert!(!shorty.is_expired());
    }

    #[test]
    fn test_shorty_expired_after_expire_at() {
        let shorty = sample_shorty(Utc::now() - Duration::seconds(1));
        assert!(shorty.is_expired());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ShortyPatch::default().is_empty());
        assert!(
            !ShortyPatch {
                url: Some("http://example.org".to_string()),
                expire_at: None,
            }
            .is_empty()
        );
    }

    #[test]
    fn test_filter_from_pairs() {
        let filter =
            ShortyFilter::from_pairs([("uid", "aZ3kQ9Lm"), ("url", "http://example.com")]).unwrap();

        assert_eq!(filter.uid.as_deref(), Some("aZ3kQ9Lm"));
        assert_eq!(filter.url.as_deref(), Some("http://example.com"));
        assert_eq!(filter.id, None);
    }

    #[test]
    fn test_filter_from_pairs_parses_id() {
        let filter = ShortyFilter::from_pairs([("id", "42")]).unwrap();
        assert_eq!(filter.id, Some(42));
    }

    #[test]
    fn test_filter_rejects_non_numeric_id() {
        let err = ShortyFilter::from_pairs([("id", "abc")]).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_filter_rejects_unknown_field() {
        let err = ShortyFilter::from_pairs([("owner", "me")]).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(ShortyFilter::default().is_empty());
        assert!(!ShortyFilter::by_uid("abc").is_empty());
    }
}
