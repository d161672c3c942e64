//! DTOs for shorty resource endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Shorty;

/// Request to create a shorty resource.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortyRequest {
    #[validate(length(min = 1, message = "Missing shorty URL"))]
    pub url: String,
}

/// Partial update for a shorty resource.
///
/// Only `url` and `expireAt` are accepted; anything else in the body
/// (including `uid`) is dropped, so the short code can never be reassigned
/// through this endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShortyRequest {
    pub url: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
}

/// Request to delete a shorty resource by its `uid` + `url` pair.
///
/// Both fields must match the stored record exactly.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteShortyRequest {
    #[validate(length(min = 1, message = "Missing shorty UID"))]
    pub uid: String,

    #[validate(length(min = 1, message = "Missing shorty URL"))]
    pub url: String,
}

/// Wire representation of a shorty resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortyResponse {
    pub id: i64,
    pub uid: String,
    pub url: String,
    pub expire_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Shorty> for ShortyResponse {
    fn from(shorty: Shorty) -> Self {
        Self {
            id: shorty.id,
            uid: shorty.uid,
            url: shorty.url,
            expire_at: shorty.expire_at,
            created_at: shorty.created_at,
            updated_at: shorty.updated_at,
        }
    }
}
