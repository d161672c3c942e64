//! PostgreSQL repository implementations.

pub mod pg_shorty_repository;

pub use pg_shorty_repository::PgShortyRepository;
