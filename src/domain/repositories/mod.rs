//! Repository trait definitions for the domain layer.
//!
//! Traits define the data-access contract; concrete implementations live in
//! `crate::infrastructure::persistence`. Mocks are auto-generated via
//! `mockall` for service unit tests.

pub mod shorty_repository;

pub use shorty_repository::{ShortyRepository, UID_CONSTRAINT, URL_CONSTRAINT};

#[cfg(test)]
pub use shorty_repository::MockShortyRepository;
