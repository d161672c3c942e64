//! Shared application state injected into HTTP handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::ShortyService;
use crate::infrastructure::persistence::PgShortyRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub shorty_service: Arc<ShortyService<PgShortyRepository>>,
}

impl AppState {
    pub fn new(db: Arc<PgPool>, shorty_service: Arc<ShortyService<PgShortyRepository>>) -> Self {
        Self { db, shorty_service }
    }
}
