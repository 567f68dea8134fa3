//! Common data structures shared across the legkor ecosystem.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lower bound of the plausible daily temperature range, in degrees Celsius.
pub const SANE_MIN_TEMP: f64 = -50.0;
/// Upper bound of the plausible daily temperature range, in degrees Celsius.
pub const SANE_MAX_TEMP: f64 = 60.0;

/// One city-day temperature triple. The canonical, persisted unit.
///
/// Identity is `(city, date)`; a store never holds more than one observation
/// per identity. The `t_min <= t_mean <= t_max` ordering and the
/// [-50, 60] bounds are soft invariants: the cleaning pipeline flags
/// violations but never rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// City the observation belongs to.
    pub city: String,
    /// Calendar day of the observation.
    pub date: NaiveDate,
    /// Daily maximum temperature, °C.
    pub t_max: f64,
    /// Daily mean temperature, °C.
    pub t_mean: f64,
    /// Daily minimum temperature, °C.
    pub t_min: f64,
}

/// A pre-validation record as decoded from a source feed.
///
/// The date is the raw `YYYYMMDD` stamp; temperature fields hold the raw
/// token, with `None` standing for an absent value or the source's numeric
/// "missing" sentinel (translated at decode time, before any coercion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Raw date stamp as carried by the feed.
    pub date: String,
    /// Raw daily-maximum token, if present.
    pub t_max: Option<String>,
    /// Raw daily-mean token, if present.
    pub t_mean: Option<String>,
    /// Raw daily-minimum token, if present.
    pub t_min: Option<String>,
}

/// The three temperature variables carried by every series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TempField {
    /// Daily maximum.
    Max,
    /// Daily mean.
    Mean,
    /// Daily minimum.
    Min,
}

impl TempField {
    /// All fields, in the column order used throughout the pipeline.
    pub const ALL: [Self; 3] = [Self::Max, Self::Mean, Self::Min];

    /// Canonical column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Max => "t_max",
            Self::Mean => "t_mean",
            Self::Min => "t_min",
        }
    }
}

impl std::fmt::Display for TempField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type-normalized series row: parsed date, numeric-or-missing values.
///
/// Produced by the first cleaning pass and consumed by every later pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    /// Calendar day of the row.
    pub date: NaiveDate,
    /// Daily maximum, if known.
    pub t_max: Option<f64>,
    /// Daily mean, if known.
    pub t_mean: Option<f64>,
    /// Daily minimum, if known.
    pub t_min: Option<f64>,
}

impl SeriesRow {
    /// Read one temperature field.
    #[must_use]
    pub const fn field(&self, field: TempField) -> Option<f64> {
        match field {
            TempField::Max => self.t_max,
            TempField::Mean => self.t_mean,
            TempField::Min => self.t_min,
        }
    }

    /// Write one temperature field.
    pub const fn set_field(&mut self, field: TempField, value: Option<f64>) {
        match field {
            TempField::Max => self.t_max = value,
            TempField::Mean => self.t_mean = value,
            TempField::Min => self.t_min = value,
        }
    }
}

/// One point of a rolling-average result. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    /// Calendar day the trailing window ends on.
    pub date: NaiveDate,
    /// Trailing mean of the daily maxima.
    pub t_max_avg: f64,
    /// Trailing mean of the daily means.
    pub t_mean_avg: f64,
    /// Trailing mean of the daily minima.
    pub t_min_avg: f64,
}

/// Filter for store reads. All provided criteria are combined with AND
/// semantics; the date range is inclusive on both ends. `limit`/`offset`
/// apply after filtering, over the date-ascending result order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationFilter {
    /// Only observations for this city.
    pub city: Option<String>,
    /// Only observations on or after this day.
    pub start_date: Option<NaiveDate>,
    /// Only observations on or before this day.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
    /// Number of rows to skip before returning.
    pub offset: Option<u64>,
}

impl ObservationFilter {
    /// Filter scoped to one city, with no other criteria.
    #[must_use]
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    /// Restrict to an inclusive date range; either bound may stay open.
    #[must_use]
    pub const fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Apply a window of `limit` rows after skipping `offset`.
    #[must_use]
    pub const fn window(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Whether an observation satisfies the city/date criteria.
    /// `limit`/`offset` are pagination, not predicates, and are ignored here.
    #[must_use]
    pub fn matches(&self, obs: &Observation) -> bool {
        if let Some(city) = &self.city
            && city != &obs.city
        {
            return false;
        }
        if let Some(start) = self.start_date
            && obs.date < start
        {
            return false;
        }
        if let Some(end) = self.end_date
            && obs.date > end
        {
            return false;
        }
        true
    }
}

/// Outcome accounting for one `save_all` batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    /// Identities that did not exist and were inserted.
    pub created: usize,
    /// Identities that existed with differing values and were rewritten.
    pub updated: usize,
    /// Identities that existed with identical values; no write issued.
    pub skipped: usize,
}

/// Result of one `sync` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// The store already held data for the city and `force` was off.
    Skipped {
        /// City that was requested.
        city: String,
    },
    /// A full fetch, clean, and persist ran to completion.
    Completed {
        /// City that was synced.
        city: String,
        /// Number of observations handed to the store.
        observations: usize,
        /// Store-side create/update/skip accounting.
        report: SaveReport,
        /// Number of data-quality warnings raised by the cleaning pipeline.
        warnings: usize,
    },
}

/// One page of a listed result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows of this page, in date-ascending order.
    pub items: Vec<T>,
    /// 1-based page number as requested.
    pub page: u64,
    /// Requested page size.
    pub page_size: u64,
    /// Total number of rows matching the filter, across all pages.
    pub total: u64,
    /// Total number of pages (`ceil(total / page_size)`).
    pub pages: u64,
}
