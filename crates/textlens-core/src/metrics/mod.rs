//! Metric functions and the result container
//!
//! Each metric is an independent pass over a list of generated
//! outputs, producing one score per output wrapped in a
//! [`MetricValue`].

pub mod pairwise;
pub mod quality;
pub mod reference;
pub mod validation;
pub mod value;

pub use pairwise::pairwise_comparison;
pub use quality::{flesch_kincaid_grade, fluency, readability, sentiment, toxicity};
pub use reference::{exact_match, rouge1, rouge2, rouge_l, semantic_similarity};
pub use validation::{
    IntDomain, contains_all_strings, contains_any_strings, contains_regex, is_float, is_int,
    is_json_array, is_json_object, matches_regex, run_valid_fn,
};
pub use value::{MetricRow, MetricValue};
