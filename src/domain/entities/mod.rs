//! Core domain entities.
//!
//! - [`Shorty`] - the persisted URL ↔ code mapping
//! - `NewShorty` / `ShortyPatch` - creation and partial-update inputs
//! - [`ShortyFilter`] - field-equality filter for lookups and listings

pub mod shorty;

pub use shorty::{NewShorty, Shorty, ShortyFilter, ShortyPatch};
