//! Application layer orchestrating domain operations.
//!
//! Services consume repository traits and expose a clean API to the HTTP
//! handlers: [`services::shorty_service::ShortyService`] owns the shorty
//! resource lifecycle.

pub mod services;
