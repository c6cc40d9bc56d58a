//! End-to-end tests over the public facade: score a batch of outputs,
//! aggregate, export rows, and render the distribution.

use textlens::metrics::{contains_any_strings, is_float, is_int, matches_regex, rouge1};
use textlens::plot::{Histogram, bin_counts};

const NO_PROMPTS: Option<&[&str]> = None;

#[test]
fn score_aggregate_and_compare() {
    let outputs = ["5", "7", "twelve", "9"];
    let result = is_int(&outputs, Some((0..=10).into()), NO_PROMPTS).unwrap();

    assert_eq!(result.metric_values(), &[1.0, 1.0, 0.0, 1.0]);
    assert_eq!(result.mean(), 0.75);
    // Threshold operators use all-scores semantics
    assert!(result <= 1.0);
    assert!(!(result >= 1.0));
}

#[test]
fn export_rows_with_prompt_metadata() {
    let prompts = ["Rate from 0 to 1", "Rate from 0 to 1"];
    let result = is_float(&["0.7", "high"], Some(0.0), Some(1.0), Some(&prompts)).unwrap();

    let rows = result.to_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].prompt.as_deref(), Some("Rate from 0 to 1"));
    assert_eq!(rows[0].metric_value, 1.0);
    assert_eq!(rows[1].generated_output, "high");
    assert_eq!(rows[1].metric_value, 0.0);
}

#[test]
fn pattern_and_containment_metrics() {
    let result = matches_regex(&["2024-01-31", "January 31"], r"\d{4}-\d{2}-\d{2}", NO_PROMPTS)
        .unwrap();
    assert_eq!(result.metric_values(), &[1.0, 0.0]);

    let result = contains_any_strings(
        &["The answer is Tokyo", "I do not know"],
        &["tokyo", "kyoto"],
        false,
        NO_PROMPTS,
    )
    .unwrap();
    assert_eq!(result.metric_values(), &[1.0, 0.0]);
}

#[test]
fn reference_metric_feeds_histogram() {
    let outputs = ["the quick brown fox", "a slow red dog", "the quick brown fox"];
    let references = ["the quick brown fox"; 3];
    let result = rouge1(&outputs, &references, NO_PROMPTS).unwrap();
    assert_eq!(result.metric_values().len(), outputs.len());

    let (edges, counts) = bin_counts(result.metric_values(), 4);
    assert_eq!(edges.len(), 5);
    assert_eq!(counts.iter().sum::<usize>(), outputs.len());

    let html = Histogram::render(&result, 4).unwrap();
    assert!(html.contains("rouge1 distribution"));
}
