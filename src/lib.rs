//! Textlens
//!
//! A library of text-evaluation metrics for language model outputs,
//! plus a small plotting helper for looking at score distributions.
//!
//! Metric functions live in [`metrics`]; each takes a list of
//! generated outputs (with metric-specific parameters and optional
//! prompts as metadata) and returns a [`MetricValue`] holding one
//! score per output. LLM-judged metrics additionally take a
//! [`JudgeClient`].
//!
//! # Example
//!
//! ```rust
//! use textlens::metrics::{contains_all_strings, is_json_object};
//!
//! let outputs = [r#"{"city": "Tokyo"}"#, "not json"];
//! let result = is_json_object(&outputs, None::<&[&str]>).unwrap();
//! assert_eq!(result.metric_values(), &[1.0, 0.0]);
//!
//! let result = contains_all_strings(&["Hello World"], &["hello"], false, None::<&[&str]>).unwrap();
//! assert!(result >= 1.0);
//! ```

pub use textlens_core::{
    EvalError, EvalResult, JudgeClient, JudgeProvider, MetricRow, MetricValue, ModelParameters,
    ProviderConfig, error, llm, metrics,
};

pub use textlens_plot as plot;
