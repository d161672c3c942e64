#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use chrono::Duration;
use shorty::api::handlers::health_handler;
use shorty::api::routes::shorty_routes;
use shorty::application::services::ShortyService;
use shorty::infrastructure::persistence::PgShortyRepository;
use shorty::state::AppState;
use shorty::utils::code_generator::CodeGenerator;
use sqlx::PgPool;
use std::sync::Arc;

pub const TEST_TTL_SECONDS: i64 = 86_400;

pub async fn insert_shorty(pool: &PgPool, uid: &str, url: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO shorties (uid, url, expire_at) \
         VALUES ($1, $2, now() + INTERVAL '1 day') RETURNING id",
    )
    .bind(uid)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_expired_shorty(pool: &PgPool, uid: &str, url: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO shorties (uid, url, expire_at) \
         VALUES ($1, $2, now() - INTERVAL '1 hour') RETURNING id",
    )
    .bind(uid)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_shorties(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shorties")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_repository(pool: PgPool) -> Arc<PgShortyRepository> {
    Arc::new(PgShortyRepository::new(Arc::new(pool)))
}

pub fn create_test_service(pool: PgPool) -> Arc<ShortyService<PgShortyRepository>> {
    let repository = create_test_repository(pool);

    Arc::new(ShortyService::new(
        repository,
        CodeGenerator::default(),
        Duration::seconds(TEST_TTL_SECONDS),
        10,
    ))
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let shorty_service = create_test_service(pool.clone());

    AppState::new(Arc::new(pool), shorty_service)
}

pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/shorties", shorty_routes())
        .with_state(state)
}
