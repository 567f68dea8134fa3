//! legkor-hungaromet
//!
//! Production connector for the Hungarian meteorological open-data portal.
//! Combines the long-range homogenized station series (one archive per
//! temperature variable) with the recent daily observational feed into one
//! raw daily series per city, implementing `legkor_core::WeatherSource`.
#![warn(missing_docs)]

/// Archive decoding: decompression, CSV parsing, sentinel translation.
pub mod decode;
/// Download transport and its production `reqwest` implementation.
pub mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use unicode_normalization::UnicodeNormalization;

use legkor_core::timeseries::merge::{RawColumn, combine_first, join_columns};
use legkor_core::types::RawRow;
use legkor_core::{LegkorError, WeatherSource};
use transport::{HttpTransport, HungarometTransport};

const BASE_HISTORICAL: &str =
    "https://odp.met.hu/climate/homogenized_data/station_data_series/from_1901";
const BASE_RECENT: &str = "https://odp.met.hu/climate/observations_hungary/daily/historical";

/// Cities served by the portal, with their observation station numbers.
const CITY_STATIONS: &[(&str, u32)] = &[("Budapest", 34429)];

/// The three homogenized feeds: directory, file prefix, value column.
/// The mean feed is prefixed `t` but carries its values in column `ta`.
const HISTORICAL_FEEDS: [(&str, &str, &str); 3] = [
    ("maximum_temperature", "tx", "tx"),
    ("minimum_temperature", "tn", "tn"),
    ("mean_temperature", "t", "ta"),
];

/// URL of one homogenized per-variable archive. The portal's file naming is
/// ASCII-only, so the city name must already be folded (see [`fold_ascii`]).
#[must_use]
pub fn historical_url(variable_dir: &str, prefix: &str, city: &str) -> String {
    format!("{BASE_HISTORICAL}/{variable_dir}/{prefix}_h_{city}_19012023.csv.gz")
}

/// URL of the recent observational archive for one station.
#[must_use]
pub fn recent_url(station: u32) -> String {
    format!("{BASE_RECENT}/HABP_1D_{station}_20141002_20241231_hist.csv.gz")
}

/// Strip diacritics from a city name: normalize to decomposed form and drop
/// the combining marks. Pure transform, applied before URL construction
/// because the portal's file names are ASCII-only even when the display name
/// is not (e.g. "Pécs" → "Pecs").
#[must_use]
pub fn fold_ascii(name: &str) -> String {
    name.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Connector for the Hungarian meteorological open-data portal.
pub struct HungarometSource {
    transport: Arc<dyn HungarometTransport>,
}

impl HungarometSource {
    /// Build with the production HTTP transport.
    #[must_use]
    pub fn new_default() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Build from an injected transport (tests, custom HTTP stacks).
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HungarometTransport>) -> Self {
        Self { transport }
    }

    fn station_for(city: &str) -> Result<u32, LegkorError> {
        CITY_STATIONS
            .iter()
            .find(|(name, _)| *name == city)
            .map(|(_, station)| *station)
            .ok_or_else(|| LegkorError::unknown_city(city))
    }

    async fn fetch_archive(&self, url: &str, source: &str) -> Result<Vec<u8>, LegkorError> {
        let compressed = self.transport.get(url).await?;
        decode::decompress(&compressed, source)
    }

    /// Download and join the three homogenized per-variable feeds,
    /// sequentially and in a fixed order.
    async fn fetch_historical(&self, city: &str) -> Result<Vec<RawRow>, LegkorError> {
        let folded = fold_ascii(city);
        let mut columns: Vec<RawColumn> = Vec::with_capacity(HISTORICAL_FEEDS.len());
        for (dir, prefix, value_column) in HISTORICAL_FEEDS {
            let url = historical_url(dir, prefix, &folded);
            let payload = self.fetch_archive(&url, "hungaromet/historical").await?;
            columns.push(decode::decode_column(&payload, value_column)?);
        }
        let [max, min, mean] = <[RawColumn; 3]>::try_from(columns)
            .map_err(|_| LegkorError::Other("historical feed count mismatch".to_string()))?;
        tracing::info!(city, "historical feeds joined");
        Ok(join_columns(max, mean, min))
    }

    async fn fetch_recent(&self, station: u32) -> Result<Vec<RawRow>, LegkorError> {
        let url = recent_url(station);
        let payload = self.fetch_archive(&url, "hungaromet/recent").await?;
        let rows = decode::decode_recent(&payload)?;
        tracing::info!(station, rows = rows.len(), "recent feed decoded");
        Ok(rows)
    }
}

#[async_trait]
impl WeatherSource for HungarometSource {
    fn name(&self) -> &'static str {
        "legkor-hungaromet"
    }

    fn cities(&self) -> Vec<String> {
        CITY_STATIONS
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect()
    }

    async fn daily_series(&self, city: &str) -> Result<Vec<RawRow>, LegkorError> {
        // Resolve the station first so an unknown city never reaches the wire.
        let station = Self::station_for(city)?;

        let older = self.fetch_historical(city).await?;
        let recent = self.fetch_recent(station).await?;

        let merged = combine_first(older, recent);
        tracing::info!(city, rows = merged.len(), "daily series merged");
        Ok(merged)
    }
}
