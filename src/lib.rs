//! This file is the root of the `nullsieve` Rust crate.
//!
//! nullsieve scans a CSV file and statistically flags tokens that are
//! probably placeholder "null" values ("n/a", "unknown", "-") even when they
//! were never declared as such. The pipeline is two-stage: a streaming scan
//! builds per-column token frequency tables and applies a lexicon substring
//! heuristic, then a finalize pass converts counts to occurrence
//! probabilities and promotes statistically rare short tokens into each
//! column's null set.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod detector;
pub mod error;
pub mod lexicon;
pub mod report;
pub mod table;

pub use config::DetectorConfig;
pub use detector::{scan_csv, NullDetector};
pub use error::SieveError;
pub use lexicon::NullLexicon;
pub use report::ColumnReport;
