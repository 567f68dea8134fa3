//! legkor-mock
//!
//! Deterministic collaborators for CI-safe tests: an in-memory
//! `ObservationStore` and a canned `WeatherSource`. Both honor the same
//! contracts as their production counterparts, including the forced-failure
//! hooks tests need to exercise error paths.
#![warn(missing_docs)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use legkor_core::types::{Observation, ObservationFilter, RawRow, SaveReport};
use legkor_core::{LegkorError, ObservationStore, WeatherSource, reconcile};

/// In-memory observation store keyed by `(city, date)`.
///
/// `save_all` runs the same reconciliation as a real store and applies the
/// plan atomically under one lock, so idempotence and accounting behave
/// exactly like the SQLite implementation.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<(String, NaiveDate), Observation>>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `save_all` always fails, for persistence-failure paths.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            fail_writes: true,
        }
    }

    /// Snapshot of everything currently stored, in identity order.
    #[must_use]
    pub fn dump(&self) -> Vec<Observation> {
        self.rows
            .lock()
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn save_all(&self, batch: Vec<Observation>) -> Result<SaveReport, LegkorError> {
        if self.fail_writes {
            return Err(LegkorError::store("forced write failure"));
        }
        if batch.is_empty() {
            return Ok(SaveReport::default());
        }
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| LegkorError::store("store mutex poisoned"))?;

        let existing: Vec<Observation> = rows.values().cloned().collect();
        let plan = reconcile(&existing, batch);
        let report = SaveReport {
            created: plan.to_create.len(),
            updated: plan.to_update.len(),
            skipped: plan.skipped,
        };
        for obs in plan.to_create.into_iter().chain(plan.to_update) {
            rows.insert((obs.city.clone(), obs.date), obs);
        }
        Ok(report)
    }

    async fn get(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, LegkorError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| LegkorError::store("store mutex poisoned"))?;
        let mut matching: Vec<Observation> = rows
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.city.cmp(&b.city)));

        let offset = usize::try_from(filter.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = filter
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn exists_for_city(&self, city: &str) -> Result<bool, LegkorError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| LegkorError::store("store mutex poisoned"))?;
        Ok(rows.keys().any(|(c, _)| c == city))
    }

    async fn count(&self, filter: &ObservationFilter) -> Result<u64, LegkorError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| LegkorError::store("store mutex poisoned"))?;
        let count = rows.values().filter(|o| filter.matches(o)).count();
        Ok(count as u64)
    }
}

/// City name that makes [`FixtureSource`] return a forced fetch failure.
pub const FAIL_CITY: &str = "FAIL";

/// Canned weather source serving fixed raw series per city.
pub struct FixtureSource {
    series: HashMap<String, Vec<RawRow>>,
}

impl FixtureSource {
    /// Source with no cities; add series with [`with_series`](Self::with_series).
    #[must_use]
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
        }
    }

    /// Register a canned series for a city.
    #[must_use]
    pub fn with_series(mut self, city: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.series.insert(city.into(), rows);
        self
    }

    /// A Budapest fixture with the classic trouble spots: a one-day value
    /// gap, a duplicated date, and an out-of-range maximum.
    #[must_use]
    pub fn budapest() -> Self {
        let row = |date: &str, t_max: &str, t_mean: &str, t_min: &str| RawRow {
            date: date.to_string(),
            t_max: (!t_max.is_empty()).then(|| t_max.to_string()),
            t_mean: (!t_mean.is_empty()).then(|| t_mean.to_string()),
            t_min: (!t_min.is_empty()).then(|| t_min.to_string()),
        };
        Self::new().with_series(
            "Budapest",
            vec![
                row("20200101", "4.0", "2.0", "0.0"),
                row("20200102", "", "3.0", "1.0"),
                row("20200103", "8.0", "4.0", "2.0"),
                row("20200103", "9.9", "9.9", "9.9"),
                row("20200104", "80.0", "5.0", "3.0"),
                row("20200105", "10.0", "6.0", "4.0"),
            ],
        )
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherSource for FixtureSource {
    fn name(&self) -> &'static str {
        "legkor-mock"
    }

    fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.series.keys().cloned().collect();
        cities.sort();
        cities
    }

    async fn daily_series(&self, city: &str) -> Result<Vec<RawRow>, LegkorError> {
        if city == FAIL_CITY {
            return Err(LegkorError::fetch("legkor-mock", "forced fetch failure"));
        }
        self.series
            .get(city)
            .cloned()
            .ok_or_else(|| LegkorError::unknown_city(city))
    }
}
