//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migration, sweeper spawning, and the Axum
//! server lifecycle.

use crate::application::services::ShortyService;
use crate::config::Config;
use crate::domain::sweeper::run_expiration_sweeper;
use crate::infrastructure::persistence::PgShortyRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, DEFAULT_ALPHABET};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool + migrations
/// - Code generator and shorty service
/// - Background expiration sweeper
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migration, bind, or server
/// runtime fails, or if the generator configuration is invalid.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(std::time::Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(std::time::Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let pool = Arc::new(pool);
    let repository = Arc::new(PgShortyRepository::new(pool.clone()));

    let generator = CodeGenerator::new(DEFAULT_ALPHABET, config.code_length)?;
    let shorty_service = Arc::new(ShortyService::new(
        repository.clone(),
        generator,
        Duration::seconds(config.default_ttl_seconds),
        config.code_max_retries,
    ));

    tokio::spawn(run_expiration_sweeper(
        repository,
        std::time::Duration::from_secs(config.sweep_interval_seconds),
    ));

    let state = AppState::new(pool, shorty_service);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(app),
    )
    .await?;

    Ok(())
}
