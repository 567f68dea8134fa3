//! legkor
//!
//! High-level facade over the legkor weather data pipeline. Wires a
//! `WeatherSource` connector and an `ObservationStore` together and exposes
//! the three caller-facing operations:
//!
//! - [`Legkor::sync`]: fetch, merge, clean, and idempotently persist one
//!   city's daily series.
//! - [`Legkor::rolling_average`]: trailing moving averages over persisted
//!   observations.
//! - [`Legkor::list_raw`]: filtered, paginated raw listings.
//!
//! An HTTP layer (not part of this workspace) is expected to sit on top,
//! handling request parsing, auth, and response shaping; the facade returns
//! plain data and typed failures.
#![warn(missing_docs)]

mod core;
mod ops;

pub use crate::core::{Legkor, LegkorBuilder};
pub use legkor_core::types::{
    Observation, ObservationFilter, Page, RollingPoint, SaveReport, SyncOutcome,
};
pub use legkor_core::{LegkorError, ObservationStore, WeatherSource};
