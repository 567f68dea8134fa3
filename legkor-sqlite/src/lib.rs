//! legkor-sqlite
//!
//! `ObservationStore` implementation over embedded SQLite. One `save_all`
//! call performs a single bulk read, an in-memory reconciliation, and one
//! transaction holding every insert and update of the batch.
//!
//! The store methods are async to fit the `legkor_core` trait seam but block
//! internally on SQLite; callers that care should keep batches reasonably
//! sized.
#![warn(missing_docs)]

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, params, params_from_iter, types::Value};

use legkor_core::types::{Observation, ObservationFilter, SaveReport};
use legkor_core::{LegkorError, ObservationStore, reconcile};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS observations (
    city   TEXT NOT NULL,
    date   TEXT NOT NULL,
    t_max  REAL NOT NULL,
    t_mean REAL NOT NULL,
    t_min  REAL NOT NULL,
    UNIQUE(city, date)
);
CREATE INDEX IF NOT EXISTS idx_observations_city_date
    ON observations(city, date);
";

fn store_err(e: rusqlite::Error) -> LegkorError {
    LegkorError::store(e.to_string())
}

/// SQLite-backed observation store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// # Errors
    /// Returns `LegkorError::Store` when the file cannot be opened or the
    /// schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LegkorError> {
        let conn = Connection::open(path).map_err(store_err)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(store_err)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store. Mostly useful for tests.
    ///
    /// # Errors
    /// Returns `LegkorError::Store` when the schema cannot be applied.
    pub fn in_memory() -> Result<Self, LegkorError> {
        Self::from_connection(Connection::open_in_memory().map_err(store_err)?)
    }

    fn from_connection(conn: Connection) -> Result<Self, LegkorError> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, LegkorError> {
        self.conn
            .lock()
            .map_err(|_| LegkorError::store("connection mutex poisoned"))
    }

    /// One bulk read of every persisted row that could collide with the
    /// batch: same cities, dates within the batch's span. A superset is
    /// fine; the reconciliation keys on exact identity.
    fn read_matching(
        conn: &Connection,
        batch: &[Observation],
    ) -> Result<Vec<Observation>, LegkorError> {
        let mut cities: Vec<&str> = batch.iter().map(|o| o.city.as_str()).collect();
        cities.sort_unstable();
        cities.dedup();
        let min_date = batch.iter().map(|o| o.date).min();
        let max_date = batch.iter().map(|o| o.date).max();
        let (Some(min_date), Some(max_date)) = (min_date, max_date) else {
            return Ok(vec![]);
        };

        let placeholders = vec!["?"; cities.len()].join(", ");
        let sql = format!(
            "SELECT city, date, t_max, t_mean, t_min FROM observations \
             WHERE city IN ({placeholders}) AND date >= ? AND date <= ?"
        );
        let mut values: Vec<Value> = cities
            .iter()
            .map(|c| Value::from((*c).to_string()))
            .collect();
        values.push(Value::from(min_date.to_string()));
        values.push(Value::from(max_date.to_string()));

        let mut stmt = conn.prepare(&sql).map_err(store_err)?;
        let rows = stmt
            .query_map(params_from_iter(values), row_to_observation)
            .map_err(store_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err)?;
        Ok(rows)
    }
}

fn row_to_observation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Observation> {
    let date_text: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Observation {
        city: row.get(0)?,
        date,
        t_max: row.get(2)?,
        t_mean: row.get(3)?,
        t_min: row.get(4)?,
    })
}

/// Build the WHERE clause and its parameters for a filter's predicates.
/// `limit`/`offset` are handled separately, they are not predicates.
fn filter_clause(filter: &ObservationFilter) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    if let Some(city) = &filter.city {
        clauses.push("city = ?");
        values.push(Value::from(city.clone()));
    }
    if let Some(start) = filter.start_date {
        clauses.push("date >= ?");
        values.push(Value::from(start.to_string()));
    }
    if let Some(end) = filter.end_date {
        clauses.push("date <= ?");
        values.push(Value::from(end.to_string()));
    }
    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (sql, values)
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn save_all(&self, batch: Vec<Observation>) -> Result<SaveReport, LegkorError> {
        if batch.is_empty() {
            return Ok(SaveReport::default());
        }

        let mut conn = self.lock()?;
        let existing = Self::read_matching(&conn, &batch)?;
        let plan = reconcile(&existing, batch);
        let report = SaveReport {
            created: plan.to_create.len(),
            updated: plan.to_update.len(),
            skipped: plan.skipped,
        };

        let tx = conn.transaction().map_err(store_err)?;
        for obs in &plan.to_create {
            tx.execute(
                "INSERT INTO observations (city, date, t_max, t_mean, t_min) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    obs.city,
                    obs.date.to_string(),
                    obs.t_max,
                    obs.t_mean,
                    obs.t_min
                ],
            )
            .map_err(store_err)?;
        }
        for obs in &plan.to_update {
            tx.execute(
                "UPDATE observations SET t_max = ?3, t_mean = ?4, t_min = ?5 \
                 WHERE city = ?1 AND date = ?2",
                params![
                    obs.city,
                    obs.date.to_string(),
                    obs.t_max,
                    obs.t_mean,
                    obs.t_min
                ],
            )
            .map_err(store_err)?;
        }
        tx.commit().map_err(store_err)?;

        tracing::info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "batch persisted"
        );
        Ok(report)
    }

    async fn get(&self, filter: &ObservationFilter) -> Result<Vec<Observation>, LegkorError> {
        let conn = self.lock()?;
        let (clause, mut values) = filter_clause(filter);
        // LIMIT -1 means "no limit" to SQLite.
        let sql = format!(
            "SELECT city, date, t_max, t_mean, t_min FROM observations{clause} \
             ORDER BY date ASC, city ASC LIMIT ? OFFSET ?"
        );
        values.push(Value::from(
            filter.limit.map_or(-1_i64, |l| i64::try_from(l).unwrap_or(i64::MAX)),
        ));
        values.push(Value::from(
            filter.offset.map_or(0_i64, |o| i64::try_from(o).unwrap_or(i64::MAX)),
        ));

        let mut stmt = conn.prepare(&sql).map_err(store_err)?;
        let rows = stmt
            .query_map(params_from_iter(values), row_to_observation)
            .map_err(store_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err)?;
        Ok(rows)
    }

    async fn exists_for_city(&self, city: &str) -> Result<bool, LegkorError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM observations WHERE city = ?1)",
            params![city],
            |row| row.get::<_, bool>(0),
        )
        .map_err(store_err)
    }

    async fn count(&self, filter: &ObservationFilter) -> Result<u64, LegkorError> {
        let conn = self.lock()?;
        let (clause, values) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM observations{clause}");
        let count: i64 = conn
            .query_row(&sql, params_from_iter(values), |row| row.get(0))
            .map_err(store_err)?;
        u64::try_from(count).map_err(|e| LegkorError::store(e.to_string()))
    }
}
