// In: src/error.rs

//! This module defines the single, unified error type for the entire nullsieve
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SieveError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Invalid usage: {0}")]
    Usage(String),

    #[error("Table capacity must be at least one bucket (got {0})")]
    InvalidCapacity(usize),

    #[error("Null lexicon holds at most {capacity} phrases; '{rejected}' does not fit")]
    LexiconOverflow { capacity: usize, rejected: String },

    #[error("CSV input produced no columns before the first row boundary")]
    EmptyInput,

    #[error("Column statistics were already finalized; finalize runs exactly once per scan")]
    AlreadyFinalized,

    #[error("Report requested before finalize computed column probabilities")]
    NotFinalized,

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error reported by the external CSV tokenizer (short read, bad quoting).
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// An error from the Serde JSON library, raised while reading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl SieveError {
    /// Process exit code for the CLI: distinct small integers per error class.
    /// 2 = bad usage, 3 = resource (open/capacity/setup), 4 = parse.
    pub fn exit_code(&self) -> i32 {
        match self {
            SieveError::Usage(_) => 2,
            SieveError::Csv(_) => 4,
            _ => 3,
        }
    }
}
