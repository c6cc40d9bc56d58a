//! Reference-based metrics
//!
//! Metrics that score each generated output against a parallel
//! ground-truth reference: exact match, ROUGE token-overlap variants
//! computed locally, and embedding-based semantic similarity which
//! delegates to the configured embeddings endpoint.

use std::collections::HashMap;

use futures::future::try_join;

use crate::error::{EvalError, EvalResult};
use crate::llm::JudgeClient;
use crate::metrics::value::MetricValue;

fn to_owned_vec<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

fn check_reference_lengths(outputs: usize, references: usize) -> EvalResult<()> {
    if outputs != references {
        return Err(EvalError::invalid_input(format!(
            "reference_outputs length {references} does not match generated_outputs length {outputs}"
        )));
    }
    Ok(())
}

fn reference_metric<S, R, P>(
    metric_name: &str,
    generated_outputs: &[S],
    reference_outputs: &[R],
    prompts: Option<&[P]>,
    score: impl Fn(&str, &str) -> f64,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    check_reference_lengths(generated_outputs.len(), reference_outputs.len())?;

    let metric_values = generated_outputs
        .iter()
        .zip(reference_outputs.iter())
        .map(|(output, reference)| score(output.as_ref(), reference.as_ref()))
        .collect();

    MetricValue::new(
        metric_name,
        prompts.map(to_owned_vec),
        to_owned_vec(generated_outputs),
        Some(to_owned_vec(reference_outputs)),
        metric_values,
        None,
    )
}

/// Checks if generated outputs exactly equal their references.
/// Binary 0/1 scores.
pub fn exact_match<S, R, P>(
    generated_outputs: &[S],
    reference_outputs: &[R],
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    reference_metric(
        "exact_match",
        generated_outputs,
        reference_outputs,
        prompts,
        |output, reference| if output == reference { 1.0 } else { 0.0 },
    )
}

/// Lowercased tokens split on whitespace and ASCII punctuation
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// N-gram occurrence counts over a token sequence
fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// F1 over clipped n-gram counts. Two empty sequences count as a
/// perfect match, a single empty one as a total miss.
fn ngram_f1(pred: &[String], gold: &[String], n: usize) -> f64 {
    let pred_counts = ngram_counts(pred, n);
    let gold_counts = ngram_counts(gold, n);
    let pred_total: usize = pred_counts.values().sum();
    let gold_total: usize = gold_counts.values().sum();

    if pred_total == 0 && gold_total == 0 {
        return 1.0;
    }
    if pred_total == 0 || gold_total == 0 {
        return 0.0;
    }

    let overlap: usize = pred_counts
        .iter()
        .map(|(gram, count)| count.min(gold_counts.get(gram).unwrap_or(&0)))
        .sum();
    if overlap == 0 {
        return 0.0;
    }

    let precision = overlap as f64 / pred_total as f64;
    let recall = overlap as f64 / gold_total as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Longest common subsequence length between two token sequences
fn lcs_len(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut row = vec![0usize; b.len() + 1];
    for token_a in a {
        let mut prev_diag = 0;
        for (j, token_b) in b.iter().enumerate() {
            let prev_row = row[j + 1];
            row[j + 1] = if token_a == token_b {
                prev_diag + 1
            } else {
                row[j + 1].max(row[j])
            };
            prev_diag = prev_row;
        }
    }
    row[b.len()]
}

fn lcs_f1(pred: &[String], gold: &[String]) -> f64 {
    if pred.is_empty() && gold.is_empty() {
        return 1.0;
    }
    if pred.is_empty() || gold.is_empty() {
        return 0.0;
    }
    let lcs = lcs_len(pred, gold);
    if lcs == 0 {
        return 0.0;
    }
    let precision = lcs as f64 / pred.len() as f64;
    let recall = lcs as f64 / gold.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

/// ROUGE-1: unigram overlap F1 between each output and its reference.
/// Scores in [0, 1].
pub fn rouge1<S, R, P>(
    generated_outputs: &[S],
    reference_outputs: &[R],
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    reference_metric(
        "rouge1",
        generated_outputs,
        reference_outputs,
        prompts,
        |output, reference| ngram_f1(&tokenize(output), &tokenize(reference), 1),
    )
}

/// ROUGE-2: bigram overlap F1. Scores in [0, 1].
pub fn rouge2<S, R, P>(
    generated_outputs: &[S],
    reference_outputs: &[R],
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    reference_metric(
        "rouge2",
        generated_outputs,
        reference_outputs,
        prompts,
        |output, reference| ngram_f1(&tokenize(output), &tokenize(reference), 2),
    )
}

/// ROUGE-L: longest-common-subsequence F1. Scores in [0, 1].
pub fn rouge_l<S, R, P>(
    generated_outputs: &[S],
    reference_outputs: &[R],
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    reference_metric(
        "rouge_l",
        generated_outputs,
        reference_outputs,
        prompts,
        |output, reference| lcs_f1(&tokenize(output), &tokenize(reference)),
    )
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Cosine similarity between the embeddings of each output and its
/// reference, fetched from the configured embeddings endpoint.
/// External-service failures propagate to the caller. Scores in
/// [-1, 1], typically [0, 1] for natural text.
pub async fn semantic_similarity<S, R, P>(
    generated_outputs: &[S],
    reference_outputs: &[R],
    prompts: Option<&[P]>,
    client: &JudgeClient,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    check_reference_lengths(generated_outputs.len(), reference_outputs.len())?;

    let outputs = to_owned_vec(generated_outputs);
    let references = to_owned_vec(reference_outputs);
    let (output_vectors, reference_vectors) =
        try_join(client.embed(&outputs), client.embed(&references)).await?;

    let metric_values = output_vectors
        .iter()
        .zip(reference_vectors.iter())
        .map(|(a, b)| cosine_similarity(a, b))
        .collect();

    MetricValue::new(
        "semantic_similarity",
        prompts.map(to_owned_vec),
        outputs,
        Some(references),
        metric_values,
        None,
    )
}
