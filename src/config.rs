// In: src/config.rs

//! The single source of truth for all nullsieve detection configuration.
//!
//! This module defines the unified `DetectorConfig` struct, which is designed
//! to be created once at the application boundary (e.g., from a user's JSON
//! file or CLI flags) and then passed down through the system via a shared,
//! read-only `Arc<DetectorConfig>`.
//!
//! The statistical thresholds here are inherited heuristics with no stated
//! derivation; they are deliberately preserved as named, overridable settings
//! rather than re-derived.

use serde::{Deserialize, Serialize};

//==================================================================================
// I. The Unified DetectorConfig
//==================================================================================

/// The single, unified configuration for one null-detection run.
/// This struct is created once and shared throughout the system via an `Arc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DetectorConfig {
    /// A token whose occurrence probability falls at or below
    /// `column average x this factor` is promoted to the column's null set.
    #[serde(default = "default_rare_probability_factor")]
    pub rare_probability_factor: f64,

    /// Fields at or above this many characters are never classified as
    /// null-like; placeholder tokens are short.
    #[serde(default = "default_max_token_len")]
    pub max_token_len: usize,

    /// Fields with more than this many words are never classified as
    /// null-like. Word count is 1 + the number of whitespace characters.
    #[serde(default = "default_max_token_words")]
    pub max_token_words: usize,

    /// Buckets allocated per column table = declared row count x this factor.
    /// A sizing heuristic to keep chains short for moderate files.
    #[serde(default = "default_bucket_factor")]
    pub bucket_factor: usize,

    /// Maximum number of phrases the null lexicon accepts at load time.
    #[serde(default = "default_lexicon_capacity")]
    pub lexicon_capacity: usize,

    /// Sentinel recorded in a column's null set when a field is empty.
    /// Distinct from any real observed token.
    #[serde(default = "default_empty_token")]
    pub empty_token: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rare_probability_factor: default_rare_probability_factor(),
            max_token_len: default_max_token_len(),
            max_token_words: default_max_token_words(),
            bucket_factor: default_bucket_factor(),
            lexicon_capacity: default_lexicon_capacity(),
            empty_token: default_empty_token(),
        }
    }
}

//==================================================================================
// II. Serde Default Helpers
//==================================================================================

fn default_rare_probability_factor() -> f64 {
    0.02
}

fn default_max_token_len() -> usize {
    10
}

fn default_max_token_words() -> usize {
    3
}

fn default_bucket_factor() -> usize {
    2
}

fn default_lexicon_capacity() -> usize {
    16
}

fn default_empty_token() -> String {
    "<empty>".to_string()
}
