//! legkor-core
//!
//! Core types, traits, and utilities shared across the legkor ecosystem.
//!
//! - `types`: common data structures (observations, raw rows, filters, reports).
//! - `source`: the `WeatherSource` connector trait implemented by data providers.
//! - `store`: the `ObservationStore` capability trait and upsert reconciliation.
//! - `timeseries`: helpers to merge, clean, and aggregate daily series.
//!
//! The crate is storage- and transport-agnostic: connectors and stores live in
//! sibling crates and plug in through the traits defined here.
#![warn(missing_docs)]

/// Unified error type for the legkor workspace.
pub mod error;
/// The `WeatherSource` connector trait.
pub mod source;
/// The `ObservationStore` capability trait and batch reconciliation.
pub mod store;
/// Time-series utilities: source merging, the cleaning pipeline, rolling means.
pub mod timeseries;
pub mod types;

pub use error::LegkorError;
pub use source::WeatherSource;
pub use store::{ObservationStore, Reconciliation, reconcile};
pub use timeseries::clean::{QualityWarning, clean, into_observations};
pub use timeseries::merge::{combine_first, join_columns};
pub use timeseries::rolling::rolling_mean;
pub use types::*;
