// In: src/report.rs

//! Rendering of the per-run textual report: one block per column listing the
//! null-like tokens found there. Token order within a block is the null
//! table's iteration order (bucket then chain); it is documented, not a
//! contract.

use std::fmt;
use std::io::{self, Write};

/// A finished run's null sets, snapshotted per column in report order.
pub struct ColumnReport {
    columns: Vec<Vec<String>>,
}

impl ColumnReport {
    pub fn new(columns: Vec<Vec<String>>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Tokens reported for a column (0-indexed).
    pub fn tokens(&self, col: usize) -> Option<&[String]> {
        self.columns.get(col).map(Vec::as_slice)
    }

    /// Writes the report: `COLUMN <n>: tok, tok, ...` with 1-based column
    /// numbers, one line per column, columns in file order.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for (col, tokens) in self.columns.iter().enumerate() {
            writeln!(out, "COLUMN {}: {}", col + 1, tokens.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (col, tokens) in self.columns.iter().enumerate() {
            writeln!(f, "COLUMN {}: {}", col + 1, tokens.join(", "))?;
        }
        Ok(())
    }
}
