//! Textlens plotting
//!
//! Renders metric score distributions as self-contained interactive
//! HTML pages, intended for a quick look at how a metric spreads over
//! a dataset.

pub mod histogram;

pub use histogram::{DEFAULT_BINS, Histogram, MAX_BINS, MIN_BINS, bin_counts};
