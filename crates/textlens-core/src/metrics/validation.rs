//! Text-structure metrics
//!
//! Stateless checks over generated outputs: numeric parse validity,
//! JSON shape, regex and substring matching, and caller-supplied
//! predicates. Every function scores each output independently with a
//! binary 0/1 value; a per-item failure (parse error, predicate panic)
//! scores 0 and never propagates.

use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{EvalError, EvalResult};
use crate::metrics::value::MetricValue;

/// Domain of acceptable integers for [`is_int`]: either an explicit
/// set of values or a closed range.
#[derive(Debug, Clone)]
pub enum IntDomain {
    Set(HashSet<i64>),
    Range(RangeInclusive<i64>),
}

impl IntDomain {
    /// Whether the domain accepts the given value
    pub fn contains(&self, value: i64) -> bool {
        match self {
            IntDomain::Set(set) => set.contains(&value),
            IntDomain::Range(range) => range.contains(&value),
        }
    }
}

impl From<RangeInclusive<i64>> for IntDomain {
    fn from(range: RangeInclusive<i64>) -> Self {
        IntDomain::Range(range)
    }
}

impl FromIterator<i64> for IntDomain {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        IntDomain::Set(iter.into_iter().collect())
    }
}

impl From<Vec<i64>> for IntDomain {
    fn from(values: Vec<i64>) -> Self {
        values.into_iter().collect()
    }
}

fn to_owned_vec<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

fn binary_metric<S, P>(
    metric_name: &str,
    generated_outputs: &[S],
    prompts: Option<&[P]>,
    check: impl Fn(&str) -> bool,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let metric_values = generated_outputs
        .iter()
        .map(|output| if check(output.as_ref()) { 1.0 } else { 0.0 })
        .collect();

    MetricValue::new(
        metric_name,
        prompts.map(to_owned_vec),
        to_owned_vec(generated_outputs),
        None,
        metric_values,
        None,
    )
}

/// Checks if generated outputs can be parsed as integers, optionally
/// within a domain like `(1..=10).into()` or `[1, 3, 5]` collected
/// into an [`IntDomain`]. Binary 0/1 scores.
///
/// Prompts are not evaluated and only recorded as metadata.
pub fn is_int<S, P>(
    generated_outputs: &[S],
    domain: Option<IntDomain>,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    binary_metric("is_int", generated_outputs, prompts, |output| {
        match output.trim().parse::<i64>() {
            Ok(value) => domain.as_ref().is_none_or(|d| d.contains(value)),
            Err(_) => false,
        }
    })
}

/// Checks if generated outputs can be parsed as floating point
/// numbers, optionally within a `min`/`max` range. Binary 0/1 scores.
pub fn is_float<S, P>(
    generated_outputs: &[S],
    min: Option<f64>,
    max: Option<f64>,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    binary_metric("is_float", generated_outputs, prompts, |output| {
        match output.trim().parse::<f64>() {
            Ok(value) => {
                if min.is_some_and(|m| value < m) {
                    false
                } else {
                    !max.is_some_and(|m| value > m)
                }
            }
            Err(_) => false,
        }
    })
}

/// Checks if generated outputs parse as JSON objects. Binary 0/1 scores.
pub fn is_json_object<S, P>(
    generated_outputs: &[S],
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    binary_metric("is_json_object", generated_outputs, prompts, |output| {
        matches!(serde_json::from_str::<Value>(output), Ok(Value::Object(_)))
    })
}

/// Checks if generated outputs parse as JSON arrays. Binary 0/1 scores.
pub fn is_json_array<S, P>(
    generated_outputs: &[S],
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    binary_metric("is_json_array", generated_outputs, prompts, |output| {
        matches!(serde_json::from_str::<Value>(output), Ok(Value::Array(_)))
    })
}

/// Checks if generated outputs fully match a regular expression. The
/// whole output must match, not just a substring. Binary 0/1 scores.
///
/// An invalid pattern is a caller error and returns
/// [`EvalError::InvalidInput`].
pub fn matches_regex<S, P>(
    generated_outputs: &[S],
    regex: &str,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    // Anchor the pattern so partial matches do not count
    let anchored = Regex::new(&format!(r"\A(?:{regex})\z"))
        .map_err(|e| EvalError::invalid_input(format!("invalid regex '{regex}': {e}")))?;

    binary_metric("matches_regex", generated_outputs, prompts, |output| {
        anchored.is_match(output)
    })
}

/// Checks if generated outputs contain a match for a regular
/// expression anywhere. Binary 0/1 scores.
pub fn contains_regex<S, P>(
    generated_outputs: &[S],
    regex: &str,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let pattern = Regex::new(regex)
        .map_err(|e| EvalError::invalid_input(format!("invalid regex '{regex}': {e}")))?;

    binary_metric("contains_regex", generated_outputs, prompts, |output| {
        pattern.is_match(output)
    })
}

fn containment_metric<S, T, P>(
    metric_name: &str,
    generated_outputs: &[S],
    strings: &[T],
    case_sensitive: bool,
    prompts: Option<&[P]>,
    mut reduce: impl FnMut(&str, &[String]) -> bool,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    T: AsRef<str>,
    P: AsRef<str>,
{
    // Lowercase folding only; locale-specific casing is out of scope
    let needles: Vec<String> = strings
        .iter()
        .map(|s| {
            if case_sensitive {
                s.as_ref().to_string()
            } else {
                s.as_ref().to_lowercase()
            }
        })
        .collect();

    let metric_values = generated_outputs
        .iter()
        .map(|output| {
            let haystack = if case_sensitive {
                output.as_ref().to_string()
            } else {
                output.as_ref().to_lowercase()
            };
            if reduce(&haystack, &needles) { 1.0 } else { 0.0 }
        })
        .collect();

    MetricValue::new(
        metric_name,
        prompts.map(to_owned_vec),
        to_owned_vec(generated_outputs),
        None,
        metric_values,
        None,
    )
}

/// Checks if generated outputs contain all of the given strings. Case
/// insensitive by default; case-insensitive matching lowercases both
/// the output and the needles. Binary 0/1 scores.
pub fn contains_all_strings<S, T, P>(
    generated_outputs: &[S],
    strings: &[T],
    case_sensitive: bool,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    T: AsRef<str>,
    P: AsRef<str>,
{
    containment_metric(
        "contains_all_strings",
        generated_outputs,
        strings,
        case_sensitive,
        prompts,
        |haystack, needles| needles.iter().all(|n| haystack.contains(n.as_str())),
    )
}

/// Checks if generated outputs contain any of the given strings.
/// Binary 0/1 scores.
pub fn contains_any_strings<S, T, P>(
    generated_outputs: &[S],
    strings: &[T],
    case_sensitive: bool,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    T: AsRef<str>,
    P: AsRef<str>,
{
    containment_metric(
        "contains_any_strings",
        generated_outputs,
        strings,
        case_sensitive,
        prompts,
        |haystack, needles| needles.iter().any(|n| haystack.contains(n.as_str())),
    )
}

/// Checks if generated outputs are valid according to an arbitrary
/// predicate. A panic raised by the predicate is caught and scored 0.
/// Binary 0/1 scores.
///
/// The process panic hook still runs for each caught panic, so a
/// predicate that panics on many outputs prints one backtrace message
/// per failing item to stderr. Callers that want quiet scoring should
/// have the predicate return `false` instead of panicking, or install
/// their own hook via [`std::panic::set_hook`].
pub fn run_valid_fn<S, P, F>(
    generated_outputs: &[S],
    valid_fn: F,
    prompts: Option<&[P]>,
) -> EvalResult<MetricValue>
where
    S: AsRef<str>,
    P: AsRef<str>,
    F: Fn(&str) -> bool,
{
    binary_metric("run_valid_fn", generated_outputs, prompts, |output| {
        catch_unwind(AssertUnwindSafe(|| valid_fn(output))).unwrap_or(false)
    })
}
