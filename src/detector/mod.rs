// In: src/detector/mod.rs

//! The null-detection pipeline.
//!
//! The detector consumes one field at a time (plus a row-boundary signal per
//! row) from the external CSV tokenizer, building per-column token frequency
//! tables as it goes. After the full file has streamed, a single `finalize`
//! pass converts counts into occurrence probabilities and promotes
//! statistically rare short tokens into each column's null set, alongside the
//! tokens the lexicon heuristic already flagged during the scan.
//!
//! Column tables exist only once the first row boundary has told us the
//! column count; that lazy setup is an explicit two-state machine
//! (`RunState::Scanning` -> `RunState::Active`), transitioned exactly once.

pub mod heuristics;

#[cfg(test)]
mod detector_tests;

use std::io::Read;
use std::sync::Arc;

use csv::ByteRecord;

use crate::config::DetectorConfig;
use crate::error::SieveError;
use crate::lexicon::NullLexicon;
use crate::report::ColumnReport;
use crate::table::{ChainTable, Insert};

//==================================================================================
// 1. Per-Token Statistics
//==================================================================================

/// Value stored in a column's statistics table. Starts life as a raw
/// frequency count; `finalize` rewrites it in place as an occurrence
/// probability (count / declared row count). The transition is one-way and
/// happens exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenStat {
    Count(u64),
    Probability(f64),
}

//==================================================================================
// 2. Run State Machine
//==================================================================================

struct ActiveState {
    cols_n: usize,
    /// 1-indexed cursor over the current row's fields; 0 between rows.
    col_curr: usize,
    column_stats: Vec<ChainTable<TokenStat>>,
    column_nulls: Vec<ChainTable<()>>,
    /// One average occurrence probability per column, set by `finalize`.
    avg_probabilities: Option<Vec<f64>>,
}

enum RunState {
    /// Before the first row boundary: all we do is count fields.
    Scanning { col_curr: usize },
    /// Column count is locked in and the per-column tables exist.
    Active(ActiveState),
}

//==================================================================================
// 3. NullDetector
//==================================================================================

/// Streaming detector for one CSV file. Borrows the lexicon (loaded once per
/// process), shares the config, and exclusively owns every column table.
pub struct NullDetector<'lex> {
    /// User-declared total row count; sizes the tables and is the probability
    /// denominator, used as-is rather than recomputed from observed rows.
    rows_n: u64,
    lexicon: &'lex NullLexicon,
    config: Arc<DetectorConfig>,
    state: RunState,
}

impl<'lex> NullDetector<'lex> {
    pub fn new(lexicon: &'lex NullLexicon, rows_n: u64, config: Arc<DetectorConfig>) -> Self {
        Self {
            rows_n,
            lexicon,
            config,
            state: RunState::Scanning { col_curr: 0 },
        }
    }

    /// Number of columns, or 0 while the first row is still being scanned.
    pub fn cols_n(&self) -> usize {
        match &self.state {
            RunState::Scanning { .. } => 0,
            RunState::Active(active) => active.cols_n,
        }
    }

    /// The accumulated null-equivalent vocabulary for a column (0-indexed).
    pub fn column_nulls(&self, col: usize) -> Option<&ChainTable<()>> {
        match &self.state {
            RunState::Scanning { .. } => None,
            RunState::Active(active) => active.column_nulls.get(col),
        }
    }

    /// A column's average occurrence probability; `None` until finalized.
    pub fn avg_probability(&self, col: usize) -> Option<f64> {
        match &self.state {
            RunState::Scanning { .. } => None,
            RunState::Active(active) => active
                .avg_probabilities
                .as_ref()
                .and_then(|avgs| avgs.get(col))
                .copied(),
        }
    }

    //------------------------------------------------------------------------------
    // 3.1 Streaming callbacks
    //------------------------------------------------------------------------------

    /// Consumes one field. The raw bytes come straight from the tokenizer's
    /// reused record buffer, so an owned, clean copy is made before anything
    /// is stored.
    pub fn on_field(&mut self, raw: &[u8]) -> Result<(), SieveError> {
        let active = match &mut self.state {
            // Header/first row: fields only determine the column count.
            RunState::Scanning { col_curr } => {
                *col_curr += 1;
                return Ok(());
            }
            RunState::Active(active) => active,
        };
        if active.avg_probabilities.is_some() {
            return Err(SieveError::InternalError(
                "on_field called after finalize".to_string(),
            ));
        }

        active.col_curr += 1;
        let col = active.col_curr - 1;
        if col >= active.cols_n {
            // Row wider than the first row: drop the overflow field, keep the run.
            log::debug!("field {} exceeds column count {}, skipped", col + 1, active.cols_n);
            return Ok(());
        }

        let field = String::from_utf8_lossy(raw).into_owned();

        // Frequency update. A rejected insert means the token was seen
        // before; bump its counter in place instead.
        let stats = &mut active.column_stats[col];
        if stats.insert(field.clone(), TokenStat::Count(1)) == Insert::Duplicate {
            if let Some(TokenStat::Count(n)) = stats.find_mut(&field) {
                *n += 1;
            }
        }

        // Lexicon heuristic: first matching phrase flags the field; once it
        // is in the null set the remaining phrases need not be tested.
        let nulls = &mut active.column_nulls[col];
        for phrase in self.lexicon.phrases() {
            if heuristics::matches_lexicon_phrase(&field, phrase, &self.config) {
                nulls.insert(field.clone(), ());
                break;
            }
        }

        // An empty field is recorded under a sentinel token, deduped by the
        // table's duplicate rejection.
        if field.is_empty() {
            nulls.insert(self.config.empty_token.clone(), ());
        }

        Ok(())
    }

    /// Signals the end of a row. The very first boundary locks in the column
    /// count and allocates the per-column tables; every boundary resets the
    /// field cursor.
    pub fn on_row(&mut self) -> Result<(), SieveError> {
        match &mut self.state {
            RunState::Scanning { col_curr } => {
                let cols_n = *col_curr;
                if cols_n == 0 {
                    return Err(SieveError::EmptyInput);
                }

                // Bucket sizing heuristic: rows_n * bucket_factor keeps
                // chains short for moderate files. Never below one bucket.
                let buckets =
                    (self.rows_n as usize).saturating_mul(self.config.bucket_factor).max(1);

                let mut column_stats = Vec::with_capacity(cols_n);
                let mut column_nulls = Vec::with_capacity(cols_n);
                for _ in 0..cols_n {
                    column_stats.push(ChainTable::new(buckets)?);
                    column_nulls.push(ChainTable::new(buckets)?);
                }

                log::info!(
                    "column count locked at {} ({} bucket(s) per table)",
                    cols_n,
                    buckets
                );
                self.state = RunState::Active(ActiveState {
                    cols_n,
                    col_curr: 0,
                    column_stats,
                    column_nulls,
                    avg_probabilities: None,
                });
            }
            RunState::Active(active) => {
                active.col_curr = 0;
            }
        }
        Ok(())
    }

    //------------------------------------------------------------------------------
    // 3.2 Finalization
    //------------------------------------------------------------------------------

    /// Runs the two post-scan passes: counts become probabilities, then rare
    /// short tokens are promoted into the null sets.
    ///
    /// Single-use by construction: the count-to-probability rewrite is
    /// destructive, so a second call is rejected rather than silently
    /// double-dividing.
    pub fn finalize(&mut self) -> Result<(), SieveError> {
        let rows_n = self.rows_n;
        let config = Arc::clone(&self.config);

        let active = match &mut self.state {
            RunState::Scanning { .. } => return Err(SieveError::EmptyInput),
            RunState::Active(active) => active,
        };
        if active.avg_probabilities.is_some() {
            return Err(SieveError::AlreadyFinalized);
        }

        // Pass 1: per-column average probability = 1 / distinct token count
        // (what a uniformly random token would score if all distinct tokens
        // were equally likely). An empty column averages 0.0.
        let mut avgs = Vec::with_capacity(active.cols_n);
        for (col, stats) in active.column_stats.iter().enumerate() {
            let distinct = stats.len();
            let avg = if distinct == 0 { 0.0 } else { 1.0 / distinct as f64 };
            log::debug!("column {}: {} distinct token(s), avg probability {avg}", col + 1, distinct);
            avgs.push(avg);
        }

        // Pass 2: rewrite every count as count / declared row count.
        for stats in &mut active.column_stats {
            stats.for_each_mut(|_, stat| {
                if let TokenStat::Count(n) = *stat {
                    *stat = TokenStat::Probability(n as f64 / rows_n as f64);
                }
            });
        }

        // Pass 3: promote statistically rare short tokens. Duplicate inserts
        // (token already flagged by the lexicon heuristic) are silent no-ops.
        let mut promoted = 0usize;
        for (col, (stats, nulls)) in active
            .column_stats
            .iter()
            .zip(active.column_nulls.iter_mut())
            .enumerate()
        {
            let avg = avgs[col];
            stats.for_each(|token, stat| {
                let TokenStat::Probability(p) = *stat else {
                    return;
                };
                if heuristics::is_statistically_rare(p, avg, &config)
                    && heuristics::is_short_token(token, &config)
                    && nulls.insert(token.to_string(), ()) == Insert::Inserted
                {
                    promoted += 1;
                }
            });
        }
        log::info!("statistical pass promoted {promoted} token(s) into the null sets");

        active.avg_probabilities = Some(avgs);
        Ok(())
    }

    /// Snapshots the per-column null sets for rendering. Only meaningful
    /// after `finalize` has run.
    pub fn report(&self) -> Result<ColumnReport, SieveError> {
        let active = match &self.state {
            RunState::Scanning { .. } => return Err(SieveError::EmptyInput),
            RunState::Active(active) => active,
        };
        if active.avg_probabilities.is_none() {
            return Err(SieveError::NotFinalized);
        }

        let mut columns = Vec::with_capacity(active.cols_n);
        for nulls in &active.column_nulls {
            let mut tokens = Vec::with_capacity(nulls.len());
            nulls.for_each(|token, ()| tokens.push(token.to_string()));
            columns.push(tokens);
        }
        Ok(ColumnReport::new(columns))
    }
}

//==================================================================================
// 4. Streaming Driver
//==================================================================================

/// Drives a detector from any byte source: the external tokenizer yields one
/// field at a time plus a boundary per record, in file order. Quoting,
/// escaping, and ragged rows are the tokenizer's business (`flexible` mode
/// accepts rows whose width differs from the first row's).
pub fn scan_csv<R: Read>(reader: R, detector: &mut NullDetector<'_>) -> Result<(), SieveError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    while csv_reader.read_byte_record(&mut record)? {
        for raw in record.iter() {
            detector.on_field(raw)?;
        }
        detector.on_row()?;
    }
    Ok(())
}
