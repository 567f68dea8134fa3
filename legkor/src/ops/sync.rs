use legkor_core::LegkorError;
use legkor_core::timeseries::clean::{clean, into_observations};
use legkor_core::types::SyncOutcome;

use crate::core::Legkor;

impl Legkor {
    /// Fetch, clean, and persist the daily series for one city.
    ///
    /// Unless `force` is set, a city that already has persisted observations
    /// is skipped without touching the network. Data-quality findings from
    /// the cleaning pipeline are logged and counted, never fatal; the series
    /// is persisted regardless.
    ///
    /// # Errors
    /// - `LegkorError::UnknownCity` when the source has no mapping for the
    ///   city; nothing was fetched.
    /// - `LegkorError::Fetch` on a download or decompression failure; the
    ///   store is untouched and the call may be retried.
    /// - `LegkorError::Data` when the payload cannot be normalized.
    /// - `LegkorError::Store` when the batch transaction fails; no partial
    ///   batch is visible.
    pub async fn sync(&self, city: &str, force: bool) -> Result<SyncOutcome, LegkorError> {
        if !force && self.store.exists_for_city(city).await? {
            tracing::info!(city, "observations already present, skipping sync");
            return Ok(SyncOutcome::Skipped {
                city: city.to_string(),
            });
        }

        tracing::info!(city, source = self.source.name(), "sync started");
        let rows = self.source.daily_series(city).await?;

        let (series, mut warnings) = clean(rows)?;
        let (observations, conversion_warnings) = into_observations(series, city);
        warnings.extend(conversion_warnings);
        for warning in &warnings {
            tracing::warn!(city, %warning, "data quality finding");
        }

        let observation_count = observations.len();
        let report = self.store.save_all(observations).await?;
        tracing::info!(
            city,
            observations = observation_count,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "sync finished"
        );

        Ok(SyncOutcome::Completed {
            city: city.to_string(),
            observations: observation_count,
            report,
            warnings: warnings.len(),
        })
    }
}
