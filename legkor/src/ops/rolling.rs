use chrono::NaiveDate;

use legkor_core::types::{ObservationFilter, RollingPoint};
use legkor_core::{LegkorError, rolling_mean};

use crate::core::Legkor;

impl Legkor {
    /// Trailing moving averages of the three temperature fields for one
    /// city, over a window of `window` days.
    ///
    /// The window shrinks at the start of the range, so every matching date
    /// yields a point; no matching observations yields an empty sequence,
    /// not an error.
    ///
    /// # Errors
    /// Returns `LegkorError::InvalidArg` for a zero window or an inverted
    /// date range, `LegkorError::Store` when the read fails.
    pub async fn rolling_average(
        &self,
        city: &str,
        window: usize,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<RollingPoint>, LegkorError> {
        if window == 0 {
            return Err(LegkorError::InvalidArg(
                "window must be at least 1 day".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (start_date, end_date)
            && start > end
        {
            return Err(LegkorError::InvalidArg(format!(
                "start_date {start} is after end_date {end}"
            )));
        }

        let filter = ObservationFilter::for_city(city).between(start_date, end_date);
        let observations = self.store.get(&filter).await?;
        tracing::debug!(
            city,
            window,
            observations = observations.len(),
            "rolling average computed"
        );
        Ok(rolling_mean(&observations, window))
    }
}
