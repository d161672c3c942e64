//! Handlers for shorty resource endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::api::dto::{
    CreateShortyRequest, DeleteShortyRequest, ShortyQuery, ShortyResponse, UpdateShortyRequest,
};
use crate::domain::entities::ShortyPatch;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shorty resource.
///
/// # Endpoint
///
/// `POST /api/shorties`
///
/// # Errors
///
/// - 400 when the URL is missing or fails the shape check
/// - 409 when the URL is already shortened
pub async fn create_shorty_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateShortyRequest>,
) -> Result<Json<ShortyResponse>, AppError> {
    payload.validate()?;

    tracing::debug!("Attempting to create shorty resource");

    let shorty = state.shorty_service.create(&payload.url).await?;

    Ok(Json(shorty.into()))
}

/// Retrieves shorty resources, optionally filtered and paginated.
///
/// # Endpoint
///
/// `GET /api/shorties?uid=&url=&id=&limit=&skip=`
///
/// `limit` defaults to 100 and `skip` to 0 when absent or non-numeric.
pub async fn list_shorties_handler(
    State(state): State<AppState>,
    Query(query): Query<ShortyQuery>,
) -> Result<Json<Vec<ShortyResponse>>, AppError> {
    let filter = query.filter()?;

    let shorties = state
        .shorty_service
        .list(&filter, query.limit, query.skip)
        .await?;

    Ok(Json(shorties.into_iter().map(Into::into).collect()))
}

/// Retrieves the first shorty resource matching a field-equality filter.
///
/// # Endpoint
///
/// `GET /api/shorties/find?uid=` (or `url=` / `id=`)
///
/// # Errors
///
/// - 400 when no filter field is supplied or `id` is non-numeric
/// - 404 when nothing matches
pub async fn find_shorty_handler(
    State(state): State<AppState>,
    Query(query): Query<ShortyQuery>,
) -> Result<Json<ShortyResponse>, AppError> {
    let filter = query.filter()?;

    let shorty = state.shorty_service.find_one(&filter).await?;

    Ok(Json(shorty.into()))
}

/// Retrieves a shorty resource by its store-assigned id.
///
/// # Endpoint
///
/// `GET /api/shorties/{id}`
pub async fn get_shorty_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ShortyResponse>, AppError> {
    let shorty = state.shorty_service.get_by_id(id).await?;

    Ok(Json(shorty.into()))
}

/// Partially updates a shorty resource.
///
/// # Endpoint
///
/// `PATCH /api/shorties/{id}`
///
/// Accepts `url` and `expireAt`; any other body field (notably `uid`) is
/// ignored.
///
/// # Errors
///
/// - 400 when the replacement URL fails the shape check
/// - 404 when the id matches nothing
/// - 409 when the replacement URL is already taken
pub async fn update_shorty_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateShortyRequest>,
) -> Result<Json<ShortyResponse>, AppError> {
    tracing::debug!(id, "Attempting to update shorty resource");

    let patch = ShortyPatch {
        url: payload.url,
        expire_at: payload.expire_at,
    };

    let shorty = state.shorty_service.update(id, patch).await?;

    Ok(Json(shorty.into()))
}

/// Deletes a shorty resource by its store-assigned id, returning the removed
/// record.
///
/// # Endpoint
///
/// `DELETE /api/shorties/{id}`
pub async fn delete_shorty_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ShortyResponse>, AppError> {
    tracing::debug!(id, "Attempting to delete shorty resource");

    let shorty = state.shorty_service.delete_by_id(id).await?;

    Ok(Json(shorty.into()))
}

/// Deletes the shorty resource matching a `uid` + `url` pair exactly,
/// returning the removed record.
///
/// # Endpoint
///
/// `DELETE /api/shorties` with a JSON body `{"uid": ..., "url": ...}`
///
/// # Errors
///
/// - 400 when either field is missing or empty
/// - 404 when the pair matches nothing
pub async fn delete_shorty_by_pair_handler(
    State(state): State<AppState>,
    Json(payload): Json<DeleteShortyRequest>,
) -> Result<Json<ShortyResponse>, AppError> {
    payload.validate()?;

    let shorty = state
        .shorty_service
        .delete_by_pair(&payload.uid, &payload.url)
        .await?;

    Ok(Json(shorty.into()))
}
