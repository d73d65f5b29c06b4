//==================================================================================
// Pipeline & End-to-End Tests
//==================================================================================

use std::sync::Arc;

use super::{scan_csv, NullDetector, RunState, TokenStat};
use crate::config::DetectorConfig;
use crate::error::SieveError;
use crate::lexicon::NullLexicon;

fn default_config() -> Arc<DetectorConfig> {
    Arc::new(DetectorConfig::default())
}

fn sorted_nulls(detector: &NullDetector<'_>, col: usize) -> Vec<String> {
    let mut tokens = Vec::new();
    detector
        .column_nulls(col)
        .expect("column should exist")
        .for_each(|token, ()| tokens.push(token.to_string()));
    tokens.sort();
    tokens
}

#[test]
fn test_first_row_locks_column_count() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 3, default_config());

    let csv = "a,b,c\n1,2,3\n4,5\n6,7,8,9\n";
    scan_csv(csv.as_bytes(), &mut detector).unwrap();

    // cols_n is set by the first row and never changes, regardless of later
    // rows having inconsistent field counts.
    assert_eq!(detector.cols_n(), 3);
}

#[test]
fn test_header_row_fields_are_not_recorded() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 2, default_config());

    scan_csv("id,status\n1,active\n2,n/a\n".as_bytes(), &mut detector).unwrap();

    let RunState::Active(active) = &detector.state else {
        panic!("detector should be active after the first row");
    };
    assert_eq!(active.column_stats[1].find("status"), None);
    assert_eq!(
        active.column_stats[1].find("active"),
        Some(&TokenStat::Count(1))
    );
}

#[test]
fn test_end_to_end_worked_example() {
    // The reference scenario: avg for column 2 is 1/3 (3 distinct tokens),
    // "active" has probability 2/4 = 0.5, far above avg * 0.02, so only the
    // two lexicon matches are reported.
    let lexicon = NullLexicon::from_phrases(["n/a", "unknown"]);
    let mut detector = NullDetector::new(&lexicon, 4, default_config());

    let csv = "id,status\n1,active\n2,n/a\n3,active\n4,unknown\n";
    scan_csv(csv.as_bytes(), &mut detector).unwrap();
    detector.finalize().unwrap();

    assert_eq!(detector.cols_n(), 2);
    assert_eq!(sorted_nulls(&detector, 0), Vec::<String>::new());
    assert_eq!(sorted_nulls(&detector, 1), vec!["n/a", "unknown"]);

    let report = detector.report().unwrap();
    let mut col2 = report.tokens(1).unwrap().to_vec();
    col2.sort();
    assert_eq!(col2, vec!["n/a", "unknown"]);
}

#[test]
fn test_counts_become_probabilities_on_finalize() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 4, default_config());

    let csv = "id,status\n1,active\n2,n/a\n3,active\n4,unknown\n";
    scan_csv(csv.as_bytes(), &mut detector).unwrap();
    detector.finalize().unwrap();

    let RunState::Active(active) = &detector.state else {
        panic!("detector should be active");
    };
    assert_eq!(
        active.column_stats[1].find("active"),
        Some(&TokenStat::Probability(0.5))
    );
    assert_eq!(
        active.column_stats[1].find("n/a"),
        Some(&TokenStat::Probability(0.25))
    );

    // Column 1 saw 4 distinct ids, column 2 three distinct statuses.
    assert_eq!(detector.avg_probability(0), Some(0.25));
    assert_eq!(detector.avg_probability(1), Some(1.0 / 3.0));
}

#[test]
fn test_finalize_runs_exactly_once() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 2, default_config());

    scan_csv("v\na\nb\n".as_bytes(), &mut detector).unwrap();
    detector.finalize().unwrap();

    // A second call would double-divide every probability; it is rejected.
    assert!(matches!(
        detector.finalize(),
        Err(SieveError::AlreadyFinalized)
    ));
}

#[test]
fn test_finalize_before_first_row_is_empty_input() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 2, default_config());
    assert!(matches!(detector.finalize(), Err(SieveError::EmptyInput)));
}

#[test]
fn test_report_requires_finalize() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 2, default_config());
    scan_csv("v\na\nb\n".as_bytes(), &mut detector).unwrap();
    assert!(matches!(detector.report(), Err(SieveError::NotFinalized)));
}

#[test]
fn test_empty_fields_dedupe_to_one_sentinel() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 4, default_config());

    // Column 2 is blank in three of four rows.
    let csv = "id,note\n1,\n2,kept\n3,\n4,\n";
    scan_csv(csv.as_bytes(), &mut detector).unwrap();

    let nulls = detector.column_nulls(1).unwrap();
    assert_eq!(nulls.len(), 1);
    assert!(nulls.find("<empty>").is_some());
}

#[test]
fn test_statistical_promotion_without_lexicon() {
    // 199 "common" + 1 "rare" over 200 declared rows: two distinct tokens,
    // avg = 0.5, threshold = 0.01 (exclusive). "rare" scores 0.005 and is
    // promoted; "common" scores 0.995 and is not.
    let lexicon = NullLexicon::from_phrases(Vec::<String>::new());
    let mut detector = NullDetector::new(&lexicon, 200, default_config());

    let mut csv = String::from("v\n");
    for _ in 0..199 {
        csv.push_str("common\n");
    }
    csv.push_str("rare\n");
    scan_csv(csv.as_bytes(), &mut detector).unwrap();
    detector.finalize().unwrap();

    assert_eq!(sorted_nulls(&detector, 0), vec!["rare"]);
}

#[test]
fn test_statistical_promotion_skips_long_tokens() {
    // Same shape as above, but the rare token is 10+ characters and the
    // length gate keeps it out of the null set.
    let lexicon = NullLexicon::from_phrases(Vec::<String>::new());
    let mut detector = NullDetector::new(&lexicon, 200, default_config());

    let mut csv = String::from("v\n");
    for _ in 0..199 {
        csv.push_str("common\n");
    }
    csv.push_str("rare-but-descriptive\n");
    scan_csv(csv.as_bytes(), &mut detector).unwrap();
    detector.finalize().unwrap();

    assert_eq!(sorted_nulls(&detector, 0), Vec::<String>::new());
}

#[test]
fn test_lexicon_and_statistical_flags_do_not_duplicate() {
    // "n/a" is both a lexicon match during the scan and rare enough for the
    // statistical pass; duplicate-insert rejection keeps a single entry.
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 200, default_config());

    let mut csv = String::from("v\n");
    for _ in 0..199 {
        csv.push_str("common\n");
    }
    csv.push_str("n/a\n");
    scan_csv(csv.as_bytes(), &mut detector).unwrap();
    detector.finalize().unwrap();

    assert_eq!(sorted_nulls(&detector, 0), vec!["n/a"]);
    assert_eq!(detector.column_nulls(0).unwrap().len(), 1);
}

#[test]
fn test_quoted_fields_stay_single_fields() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 2, default_config());

    // The embedded comma is quoted; the tokenizer must deliver one field.
    let csv = "id,desc\n1,\"a, b\"\n2,plain\n";
    scan_csv(csv.as_bytes(), &mut detector).unwrap();
    assert_eq!(detector.cols_n(), 2);

    let RunState::Active(active) = &detector.state else {
        panic!("detector should be active");
    };
    assert_eq!(
        active.column_stats[1].find("a, b"),
        Some(&TokenStat::Count(1))
    );
}

#[test]
fn test_empty_source_never_activates() {
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 2, default_config());
    scan_csv("".as_bytes(), &mut detector).unwrap();
    assert_eq!(detector.cols_n(), 0);
    assert!(matches!(detector.finalize(), Err(SieveError::EmptyInput)));
}

#[test]
fn test_zero_declared_rows_still_allocates_tables() {
    // rows_n only sizes the tables; a zero declaration clamps to one bucket
    // instead of failing table construction.
    let lexicon = NullLexicon::from_phrases(["n/a"]);
    let mut detector = NullDetector::new(&lexicon, 0, default_config());
    scan_csv("a,b\n".as_bytes(), &mut detector).unwrap();
    assert_eq!(detector.cols_n(), 2);
}
