//! Query-string parameters for shorty lookups and listings.

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};

use crate::domain::entities::ShortyFilter;
use crate::error::AppError;

/// Filter and pagination parameters.
///
/// `limit` and `skip` fall back to their defaults when absent or non-numeric
/// (`DefaultOnError`), matching the lenient contract of the list operation.
/// Filter fields are passed through [`ShortyFilter::from_pairs`], which
/// rejects a non-numeric `id`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ShortyQuery {
    pub id: Option<String>,
    pub uid: Option<String>,
    pub url: Option<String>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub skip: Option<i64>,
}

impl ShortyQuery {
    /// Builds the domain filter from the present filter fields.
    pub fn filter(&self) -> Result<ShortyFilter, AppError> {
        let pairs = [
            ("id", self.id.as_deref()),
            ("uid", self.uid.as_deref()),
            ("url", self.url.as_deref()),
        ];

        ShortyFilter::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Query strings reach this DTO as string-valued fields, so tests feed it
    // string values the same way the extractor does.
    fn from_value(value: serde_json::Value) -> ShortyQuery {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filter_fields_pass_through() {
        let query = from_value(json!({ "uid": "aZ3kQ9Lm", "url": "http://example.com" }));
        let filter = query.filter().unwrap();

        assert_eq!(filter.uid.as_deref(), Some("aZ3kQ9Lm"));
        assert_eq!(filter.url.as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_numeric_id_is_parsed() {
        let query = from_value(json!({ "id": "42" }));
        assert_eq!(query.filter().unwrap().id, Some(42));
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let query = from_value(json!({ "id": "abc" }));
        assert!(matches!(
            query.filter().unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[test]
    fn test_absent_pagination_is_none() {
        let query = from_value(json!({}));
        assert_eq!(query.limit, None);
        assert_eq!(query.skip, None);
    }

    #[test]
    fn test_numeric_pagination_is_parsed() {
        let query = from_value(json!({ "limit": "5", "skip": "10" }));
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.skip, Some(10));
    }

    #[test]
    fn test_non_numeric_pagination_falls_back_to_none() {
        let query = from_value(json!({ "limit": "abc", "skip": "xyz" }));
        assert_eq!(query.limit, None);
        assert_eq!(query.skip, None);
    }

    #[test]
    fn test_empty_query_filter_is_empty() {
        let query = from_value(json!({}));
        assert!(query.filter().unwrap().is_empty());
    }
}
