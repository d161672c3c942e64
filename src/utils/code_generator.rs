//! Short code generation.
//!
//! Produces one candidate code per call by sampling the configured alphabet
//! without replacement. The generator is stateless between calls and gives no
//! uniqueness guarantee of its own; collision handling belongs to
//! [`crate::application::services::ShortyService`].

use crate::error::AppError;
use rand::Rng;
use rand::seq::index;
use serde_json::json;
use std::collections::HashSet;

/// Default 62-symbol alphabet: lowercase, uppercase, digits.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default code length.
pub const DEFAULT_LENGTH: usize = 8;

/// Generator for fixed-length random short codes.
///
/// Each call to [`next`](Self::next) draws `length` distinct symbols uniformly
/// at random from the alphabet and concatenates them in the order drawn. The
/// draw is a permutation sample, not a counter: codes are non-sequential and
/// non-guessable, at the price of a birthday-bound collision risk.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator over `alphabet` producing codes of `length` symbols.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfiguration`] when `length` is zero,
    /// `length` exceeds the alphabet size (sampling without replacement would
    /// run dry), or the alphabet contains a repeated symbol (which would skew
    /// the draw).
    pub fn new(alphabet: &str, length: usize) -> Result<Self, AppError> {
        let alphabet: Vec<char> = alphabet.chars().collect();

        if length == 0 {
            return Err(AppError::invalid_configuration(
                "Code length must be a positive integer",
                json!({ "length": length }),
            ));
        }

        if length > alphabet.len() {
            return Err(AppError::invalid_configuration(
                "Code length cannot exceed the alphabet size",
                json!({ "length": length, "alphabet_size": alphabet.len() }),
            ));
        }

        let distinct: HashSet<char> = alphabet.iter().copied().collect();
        if distinct.len() != alphabet.len() {
            return Err(AppError::invalid_configuration(
                "Alphabet must not contain repeated symbols",
                json!({ "alphabet_size": alphabet.len(), "distinct_symbols": distinct.len() }),
            ));
        }

        Ok(Self { alphabet, length })
    }

    /// Creates a generator over the default alphabet with a custom length.
    pub fn with_length(length: usize) -> Result<Self, AppError> {
        Self::new(DEFAULT_ALPHABET, length)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Produces one candidate code from the process RNG.
    pub fn next(&self) -> String {
        self.next_with(&mut rand::rng())
    }

    /// Produces one candidate code from the supplied RNG.
    ///
    /// The RNG is injectable for deterministic tests only; the public service
    /// API never exposes a seed.
    pub fn next_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        index::sample(rng, self.alphabet.len(), self.length)
            .into_iter()
            .map(|i| self.alphabet[i])
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET, DEFAULT_LENGTH).expect("default generator configuration")
    }
}
