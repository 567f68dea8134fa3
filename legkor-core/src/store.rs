use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::LegkorError;
use crate::types::{Observation, ObservationFilter, SaveReport};

/// Capability trait for persistence collaborators.
///
/// Implementations must provide per-identity uniqueness on `(city, date)`,
/// bulk create, bulk update, filtered range queries, and transactional batch
/// semantics for `save_all`. Nothing else is assumed about the engine, so an
/// embedded database, a relational server, or an in-memory test double can
/// all satisfy it.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Reconcile and persist a batch of observations.
    ///
    /// For each `(city, date)` identity: absent rows are created, rows with
    /// any differing field (exact float inequality) are updated, identical
    /// rows are skipped. All creates and updates of one call are applied
    /// inside a single transaction; either everything commits or nothing is
    /// visible. An empty batch is a no-op reporting zeros.
    ///
    /// # Errors
    /// Returns `LegkorError::Store` when the transaction fails; the store is
    /// left unchanged.
    async fn save_all(&self, batch: Vec<Observation>) -> Result<SaveReport, LegkorError>;

    /// Fetch observations matching the filter, ordered by date ascending.
    ///
    /// # Errors
    /// Returns `LegkorError::Store` when the read fails.
    async fn get(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, LegkorError>;

    /// Whether at least one observation exists for the city. Cheap pre-check
    /// used to avoid redundant full resyncs.
    ///
    /// # Errors
    /// Returns `LegkorError::Store` when the read fails.
    async fn exists_for_city(&self, city: &str) -> Result<bool, LegkorError>;

    /// Count observations matching the filter, ignoring `limit`/`offset`.
    ///
    /// # Errors
    /// Returns `LegkorError::Store` when the read fails.
    async fn count(&self, filter: &ObservationFilter) -> Result<u64, LegkorError>;
}

/// In-memory diff of a candidate batch against existing store state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Identities absent from the store.
    pub to_create: Vec<Observation>,
    /// Identities present with at least one differing field.
    pub to_update: Vec<Observation>,
    /// Identities present with identical values; untouched.
    pub skipped: usize,
}

/// Compute the create/update/skip plan for a batch against existing rows.
///
/// The comparison uses exact float inequality, no tolerance. When a batch
/// carries one identity more than once, the first occurrence wins and later
/// duplicates are dropped before diffing. Plan entries come out in
/// `(city, date)` order, so a store can apply them deterministically.
#[must_use]
pub fn reconcile(existing: &[Observation], batch: Vec<Observation>) -> Reconciliation {
    let existing_map: BTreeMap<(&str, NaiveDate), &Observation> = existing
        .iter()
        .map(|o| ((o.city.as_str(), o.date), o))
        .collect();

    let mut candidates: BTreeMap<(String, NaiveDate), Observation> = BTreeMap::new();
    for obs in batch {
        candidates
            .entry((obs.city.clone(), obs.date))
            .or_insert(obs);
    }

    let mut plan = Reconciliation::default();
    for ((city, date), obs) in candidates {
        match existing_map.get(&(city.as_str(), date)) {
            None => plan.to_create.push(obs),
            Some(current) => {
                if current.t_max != obs.t_max
                    || current.t_mean != obs.t_mean
                    || current.t_min != obs.t_min
                {
                    plan.to_update.push(obs);
                } else {
                    plan.skipped += 1;
                }
            }
        }
    }
    plan
}
