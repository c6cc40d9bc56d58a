//! Metric result container
//!
//! Every metric function packages its per-output scores into a
//! [`MetricValue`], an immutable snapshot of the inputs and the scores
//! computed for them. Length invariants are checked once, at
//! construction; after that the value only supports aggregation,
//! tabular export, and threshold comparison.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{EvalError, EvalResult};

/// Scores for one metric invocation, parallel to the generated outputs.
///
/// Invariant: `metric_values.len() == generated_outputs.len()`, and the
/// optional `prompts` / `reference_outputs` sequences match that length
/// too. [`MetricValue::new`] refuses to construct otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    metric_name: String,
    prompts: Option<Vec<String>>,
    generated_outputs: Vec<String>,
    reference_outputs: Option<Vec<String>>,
    metric_values: Vec<f64>,
    language: Option<String>,
}

/// One row of the tabular export: a single output with its score and
/// the metadata it was scored alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub prompt: Option<String>,
    pub generated_output: String,
    pub reference_output: Option<String>,
    pub metric_value: f64,
}

impl MetricValue {
    /// Create a new metric value, validating that all parallel
    /// sequences have the same length as `generated_outputs`.
    pub fn new(
        metric_name: impl Into<String>,
        prompts: Option<Vec<String>>,
        generated_outputs: Vec<String>,
        reference_outputs: Option<Vec<String>>,
        metric_values: Vec<f64>,
        language: Option<String>,
    ) -> EvalResult<Self> {
        let expected = generated_outputs.len();

        if metric_values.len() != expected {
            return Err(EvalError::invalid_input(format!(
                "metric_values length {} does not match generated_outputs length {}",
                metric_values.len(),
                expected
            )));
        }
        if let Some(prompts) = &prompts {
            if prompts.len() != expected {
                return Err(EvalError::invalid_input(format!(
                    "prompts length {} does not match generated_outputs length {}",
                    prompts.len(),
                    expected
                )));
            }
        }
        if let Some(references) = &reference_outputs {
            if references.len() != expected {
                return Err(EvalError::invalid_input(format!(
                    "reference_outputs length {} does not match generated_outputs length {}",
                    references.len(),
                    expected
                )));
            }
        }

        Ok(Self {
            metric_name: metric_name.into(),
            prompts,
            generated_outputs,
            reference_outputs,
            metric_values,
            language,
        })
    }

    /// Name of the metric that produced this value
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    /// Prompts used to generate the outputs, if recorded
    pub fn prompts(&self) -> Option<&[String]> {
        self.prompts.as_deref()
    }

    /// The outputs that were scored
    pub fn generated_outputs(&self) -> &[String] {
        &self.generated_outputs
    }

    /// Reference outputs, if the metric used any
    pub fn reference_outputs(&self) -> Option<&[String]> {
        self.reference_outputs.as_deref()
    }

    /// Per-output scores, parallel to [`Self::generated_outputs`]
    pub fn metric_values(&self) -> &[f64] {
        &self.metric_values
    }

    /// Language tag the metric was computed for, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Number of scored outputs
    pub fn len(&self) -> usize {
        self.metric_values.len()
    }

    /// Whether no outputs were scored
    pub fn is_empty(&self) -> bool {
        self.metric_values.is_empty()
    }

    /// Arithmetic mean of the scores, or 0.0 when empty
    pub fn mean(&self) -> f64 {
        if self.metric_values.is_empty() {
            return 0.0;
        }
        self.metric_values.iter().sum::<f64>() / self.metric_values.len() as f64
    }

    /// Export one row per output, carrying the prompt and reference
    /// alongside the score
    pub fn to_rows(&self) -> Vec<MetricRow> {
        self.generated_outputs
            .iter()
            .enumerate()
            .map(|(i, output)| MetricRow {
                prompt: self.prompts.as_ref().map(|p| p[i].clone()),
                generated_output: output.clone(),
                reference_output: self.reference_outputs.as_ref().map(|r| r[i].clone()),
                metric_value: self.metric_values[i],
            })
            .collect()
    }
}

impl PartialEq<f64> for MetricValue {
    /// True when every score equals the threshold
    fn eq(&self, threshold: &f64) -> bool {
        self.metric_values.iter().all(|v| v == threshold)
    }
}

/// Threshold comparison with "all scores satisfy the relation"
/// semantics. `partial_cmp` only reports an ordering when every score
/// agrees on it; the relational operators are each overridden as a
/// single reducer so that e.g. `value <= 0.5` holds for mixed
/// less-than and equal scores.
impl PartialOrd<f64> for MetricValue {
    fn partial_cmp(&self, threshold: &f64) -> Option<Ordering> {
        if self.metric_values.iter().all(|v| v < threshold) {
            Some(Ordering::Less)
        } else if self.metric_values.iter().all(|v| v > threshold) {
            Some(Ordering::Greater)
        } else if self.metric_values.iter().all(|v| v == threshold) {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    fn lt(&self, threshold: &f64) -> bool {
        self.metric_values.iter().all(|v| v < threshold)
    }

    fn le(&self, threshold: &f64) -> bool {
        self.metric_values.iter().all(|v| v <= threshold)
    }

    fn gt(&self, threshold: &f64) -> bool {
        self.metric_values.iter().all(|v| v > threshold)
    }

    fn ge(&self, threshold: &f64) -> bool {
        self.metric_values.iter().all(|v| v >= threshold)
    }
}
