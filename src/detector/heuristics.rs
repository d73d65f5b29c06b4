// In: src/detector/heuristics.rs

//! Pure, stateless classification predicates for null-likeness. Both the
//! lexicon substring test and the statistical rarity test live here so the
//! detector's streaming code stays free of threshold arithmetic.

use crate::config::DetectorConfig;

/// Word count of a field: 1 + the number of ASCII whitespace characters.
/// Intentionally byte-oriented; the pipeline makes no Unicode-aware
/// tokenization guarantees.
pub fn word_count(field: &str) -> usize {
    1 + field.bytes().filter(|b| b.is_ascii_whitespace()).count()
}

/// True if `field` looks like a null placeholder for the lexicon `phrase`:
/// the phrase appears as a substring, the field is short (< `max_token_len`
/// chars, <= `max_token_words` words), and the field is not much longer than
/// the phrase itself (< 2x its length). The last bound stops a phrase like
/// "none" from flagging ordinary words that merely contain it.
pub fn matches_lexicon_phrase(field: &str, phrase: &str, config: &DetectorConfig) -> bool {
    field.contains(phrase)
        && word_count(field) <= config.max_token_words
        && field.len() < config.max_token_len
        && field.len() < 2 * phrase.len()
}

/// True if an occurrence probability is rare against the column's average.
///
/// The boundary is inclusive below an average of 0.5 and exclusive at or
/// above it, exactly as the inherited heuristic draws it; the 0.02 factor is
/// [`DetectorConfig::rare_probability_factor`].
pub fn is_statistically_rare(probability: f64, column_avg: f64, config: &DetectorConfig) -> bool {
    let threshold = column_avg * config.rare_probability_factor;
    if column_avg < 0.5 {
        probability <= threshold
    } else {
        probability < threshold
    }
}

/// Length/word-count gate shared by the statistical classification pass.
pub fn is_short_token(field: &str, config: &DetectorConfig) -> bool {
    word_count(field) <= config.max_token_words && field.len() < config.max_token_len
}
