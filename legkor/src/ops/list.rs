use chrono::NaiveDate;

use legkor_core::LegkorError;
use legkor_core::types::{Observation, ObservationFilter, Page};

use crate::core::Legkor;

impl Legkor {
    /// Filtered, paginated listing of persisted observations, date
    /// ascending. Pages are 1-based.
    ///
    /// # Errors
    /// Returns `LegkorError::InvalidArg` when `page` or `page_size` is zero,
    /// `LegkorError::Store` when a read fails.
    pub async fn list_raw(
        &self,
        city: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        page: u64,
        page_size: u64,
    ) -> Result<Page<Observation>, LegkorError> {
        if page == 0 {
            return Err(LegkorError::InvalidArg("page is 1-based".to_string()));
        }
        if page_size == 0 {
            return Err(LegkorError::InvalidArg(
                "page_size must be at least 1".to_string(),
            ));
        }

        let filter = ObservationFilter {
            city: city.map(ToString::to_string),
            start_date,
            end_date,
            ..ObservationFilter::default()
        };

        let total = self.store.count(&filter).await?;
        let items = self
            .store
            .get(&filter.clone().window(page_size, (page - 1) * page_size))
            .await?;

        Ok(Page {
            items,
            page,
            page_size,
            total,
            pages: total.div_ceil(page_size),
        })
    }
}
