//! Textlens Core Library
//!
//! Text-evaluation metrics for language model outputs: stateless
//! structure checks (number/JSON parsing, regex and substring
//! matching), reference-based overlap metrics, and LLM-judged quality
//! metrics, all returning per-output scores in a [`MetricValue`].
//!
//! # Example
//!
//! ```rust
//! use textlens_core::metrics::is_int;
//!
//! let result = is_int(&["5", "abc", "7"], None, None::<&[&str]>).unwrap();
//! assert_eq!(result.metric_values(), &[1.0, 0.0, 1.0]);
//! assert_eq!(result.mean(), 2.0 / 3.0);
//! ```

pub mod error;
pub mod llm;
pub mod metrics;

// Re-export commonly used types
pub use error::{EvalError, EvalResult};
pub use llm::{JudgeClient, JudgeProvider, ModelParameters, ProviderConfig};
pub use metrics::{MetricRow, MetricValue};
