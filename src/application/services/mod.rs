//! Business logic services for the application layer.

pub mod shorty_service;

pub use shorty_service::ShortyService;
