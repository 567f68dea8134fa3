//! Archive decoding: gzip decompression, semicolon-CSV parsing, and the
//! portal's missing-value sentinel translation.

use std::io::Read;

use flate2::read::GzDecoder;

use legkor_core::LegkorError;
use legkor_core::timeseries::merge::RawColumn;
use legkor_core::types::RawRow;

/// The portal's reserved numeric value standing for "missing".
const NA_SENTINEL: f64 = -999.0;

/// Number of preamble lines the recent feed carries before its header row.
const RECENT_PREAMBLE_LINES: usize = 5;

/// Decompress one gzip archive into its delimited-text payload.
///
/// # Errors
/// Returns `LegkorError::Fetch` tagged with `source` on a corrupt archive;
/// decompression failures are transient fetch failures like the download
/// itself.
pub fn decompress(bytes: &[u8], source: &str) -> Result<Vec<u8>, LegkorError> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| LegkorError::fetch(source, format!("decompression failed: {e}")))?;
    Ok(out)
}

fn semicolon_reader(data: &[u8]) -> csv::Reader<&[u8]> {
    // Headers carry stray whitespace; trim everything on the way in.
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data)
}

/// Translate one raw cell: empty cells and the numeric sentinel become
/// missing, everything else is kept verbatim for the cleaning pipeline.
fn translate(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if cell.parse::<f64>().is_ok_and(|v| v == NA_SENTINEL) {
        return None;
    }
    Some(cell.to_string())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, LegkorError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| LegkorError::Data(format!("source is missing the '{name}' column")))
}

/// Decode one per-variable historical feed into `(date stamp, token)` pairs.
///
/// Only the `Time` column and the named value column are read; everything
/// else (including the `EOR` end-of-record marker) is dropped.
///
/// # Errors
/// Returns `LegkorError::Data` when an expected column is absent or a row
/// cannot be read.
pub fn decode_column(data: &[u8], value_column: &str) -> Result<RawColumn, LegkorError> {
    let mut reader = semicolon_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| LegkorError::Data(e.to_string()))?
        .clone();
    let time_idx = column_index(&headers, "Time")?;
    let value_idx = column_index(&headers, value_column)?;

    let mut column = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LegkorError::Data(e.to_string()))?;
        let Some(stamp) = record.get(time_idx) else {
            continue;
        };
        if stamp.trim().is_empty() {
            continue;
        }
        let token = record.get(value_idx).and_then(translate);
        column.push((stamp.trim().to_string(), token));
    }
    Ok(column)
}

/// Decode the recent observational feed into raw rows.
///
/// The feed opens with five preamble lines before the header row; of the
/// header's many columns only `Time`, `t` (mean), `tx` (max), and `tn` (min)
/// are kept.
///
/// # Errors
/// Returns `LegkorError::Data` on a truncated preamble, a missing column, or
/// an unreadable row.
pub fn decode_recent(data: &[u8]) -> Result<Vec<RawRow>, LegkorError> {
    let body = skip_preamble(data, RECENT_PREAMBLE_LINES)?;
    let mut reader = semicolon_reader(body);
    let headers = reader
        .headers()
        .map_err(|e| LegkorError::Data(e.to_string()))?
        .clone();
    let time_idx = column_index(&headers, "Time")?;
    let mean_idx = column_index(&headers, "t")?;
    let max_idx = column_index(&headers, "tx")?;
    let min_idx = column_index(&headers, "tn")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LegkorError::Data(e.to_string()))?;
        let Some(stamp) = record.get(time_idx) else {
            continue;
        };
        if stamp.trim().is_empty() {
            continue;
        }
        rows.push(RawRow {
            date: stamp.trim().to_string(),
            t_max: record.get(max_idx).and_then(translate),
            t_mean: record.get(mean_idx).and_then(translate),
            t_min: record.get(min_idx).and_then(translate),
        });
    }
    Ok(rows)
}

fn skip_preamble(data: &[u8], lines: usize) -> Result<&[u8], LegkorError> {
    let mut offset = 0;
    for _ in 0..lines {
        match data[offset..].iter().position(|&b| b == b'\n') {
            Some(pos) => offset += pos + 1,
            None => {
                return Err(LegkorError::Data(
                    "recent feed ended inside its preamble".to_string(),
                ));
            }
        }
    }
    Ok(&data[offset..])
}
