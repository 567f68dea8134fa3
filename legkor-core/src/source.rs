use async_trait::async_trait;

use crate::LegkorError;
use crate::types::RawRow;

/// Connector trait implemented by weather data providers.
///
/// A source owns everything up to and including the multi-feed merge: it
/// returns one raw daily series per city, with at most one row per date
/// stamp, ordered chronologically, and the "missing" sentinel already
/// translated to `None`. Cleaning and persistence are not its concern.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Stable provider name used in logs and error attribution.
    fn name(&self) -> &'static str;

    /// Cities this source can serve.
    fn cities(&self) -> Vec<String>;

    /// Fetch and merge the raw daily series for a city.
    ///
    /// # Errors
    /// Returns `LegkorError::UnknownCity` when the city has no source
    /// mapping (nothing is fetched), or `LegkorError::Fetch` when any
    /// download or decompression fails (the merge aborts, nothing partial
    /// is returned).
    async fn daily_series(&self, city: &str) -> Result<Vec<RawRow>, LegkorError>;
}
