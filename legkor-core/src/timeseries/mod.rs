//! Time-series utilities: multi-source merging, the ordered cleaning
//! pipeline, and rolling-window aggregation.

/// The fixed, ordered validation and cleaning pass sequence.
pub mod clean;
/// Combine-with-precedence merging of source series.
pub mod merge;
/// Trailing-window moving averages.
pub mod rolling;
