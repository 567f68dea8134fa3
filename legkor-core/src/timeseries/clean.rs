use std::collections::HashSet;

use chrono::NaiveDate;

use crate::LegkorError;
use crate::types::{
    Observation, RawRow, SANE_MAX_TEMP, SANE_MIN_TEMP, SeriesRow, TempField,
};

/// A non-fatal data-quality finding raised by one cleaning pass.
///
/// Warnings are reported, never acted on beyond what the pass itself does:
/// the pipeline keeps running and the series is still persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityWarning {
    /// Days inside the series' min..=max span with no row at all.
    MissingDates(Vec<NaiveDate>),
    /// Dates where one field holds no value.
    MissingValues {
        /// The field with holes.
        field: TempField,
        /// Dates of the holes.
        dates: Vec<NaiveDate>,
    },
    /// Dates that appeared more than once; later rows were dropped.
    DuplicateDates(Vec<NaiveDate>),
    /// Dates where one field falls outside the plausible range. Values are
    /// flagged only, never clamped or removed.
    OutOfRange {
        /// The offending field.
        field: TempField,
        /// Dates of the offending values.
        dates: Vec<NaiveDate>,
    },
    /// Dates where `t_min > t_mean` or `t_mean > t_max`. Flag-only.
    Inconsistent(Vec<NaiveDate>),
    /// Rows dropped at conversion time because interpolation could not fill
    /// a field (no neighbor on one side).
    DroppedIncomplete(Vec<NaiveDate>),
}

impl std::fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDates(dates) => write!(f, "missing dates: {dates:?}"),
            Self::MissingValues { field, dates } => {
                write!(f, "missing values in {field} at dates: {dates:?}")
            }
            Self::DuplicateDates(dates) => write!(f, "duplicates found at dates: {dates:?}"),
            Self::OutOfRange { field, dates } => {
                write!(f, "{field} has unrealistic values at dates: {dates:?}")
            }
            Self::Inconsistent(dates) => {
                write!(f, "inconsistent temperature values at dates: {dates:?}")
            }
            Self::DroppedIncomplete(dates) => {
                write!(f, "dropped rows with unfillable values at dates: {dates:?}")
            }
        }
    }
}

/// Run the full cleaning sequence over one merged series.
///
/// The pass order is a hard contract; later passes assume earlier ones
/// already ran. Passes 2, 3, 5, and 6 only observe; passes 1, 4, and 7
/// transform.
///
/// # Errors
/// Returns `LegkorError::Data` when a date stamp cannot be parsed (pass 1).
/// All other findings are warnings, never errors.
pub fn clean(rows: Vec<RawRow>) -> Result<(Vec<SeriesRow>, Vec<QualityWarning>), LegkorError> {
    tracing::debug!(rows = rows.len(), "cleaning started");
    let series = normalize_types(rows)?;

    let mut warnings = check_missing_dates(&series);
    warnings.extend(check_missing_values(&series));
    let (series, duplicate_warnings) = drop_duplicate_dates(series);
    warnings.extend(duplicate_warnings);
    warnings.extend(check_bounds(&series));
    warnings.extend(check_consistency(&series));
    let series = interpolate_gaps(series);

    tracing::debug!(
        rows = series.len(),
        warnings = warnings.len(),
        "cleaning finished"
    );
    Ok((series, warnings))
}

/// Pass 1: coerce every field to its proper type.
///
/// Date stamps are parsed as `YYYYMMDD` (falling back to `YYYY-MM-DD`);
/// an unparseable stamp is a fatal data error. Temperature tokens that do
/// not parse as numbers become missing, not errors.
///
/// # Errors
/// Returns `LegkorError::Data` naming the offending stamp.
pub fn normalize_types(rows: Vec<RawRow>) -> Result<Vec<SeriesRow>, LegkorError> {
    rows.into_iter()
        .map(|row| {
            let date = parse_stamp(row.date.trim())
                .ok_or_else(|| LegkorError::Data(format!("unparseable date stamp: {}", row.date)))?;
            Ok(SeriesRow {
                date,
                t_max: parse_token(row.t_max.as_deref()),
                t_mean: parse_token(row.t_mean.as_deref()),
                t_min: parse_token(row.t_min.as_deref()),
            })
        })
        .collect()
}

fn parse_stamp(stamp: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(stamp, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(stamp, "%Y-%m-%d"))
        .ok()
}

fn parse_token(token: Option<&str>) -> Option<f64> {
    token.and_then(|t| t.trim().parse::<f64>().ok())
}

/// Pass 2: report every day absent from the contiguous daily span covered by
/// the series. Observational only; no rows are inserted.
#[must_use]
pub fn check_missing_dates(series: &[SeriesRow]) -> Vec<QualityWarning> {
    let Some(first) = series.iter().map(|r| r.date).min() else {
        return vec![];
    };
    let last = series.iter().map(|r| r.date).max().unwrap_or(first);

    let present: HashSet<NaiveDate> = series.iter().map(|r| r.date).collect();
    let missing: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| !present.contains(d))
        .collect();

    if missing.is_empty() {
        vec![]
    } else {
        vec![QualityWarning::MissingDates(missing)]
    }
}

/// Pass 3: report, per field, the dates holding a missing value.
#[must_use]
pub fn check_missing_values(series: &[SeriesRow]) -> Vec<QualityWarning> {
    TempField::ALL
        .into_iter()
        .filter_map(|field| {
            let dates: Vec<NaiveDate> = series
                .iter()
                .filter(|r| r.field(field).is_none())
                .map(|r| r.date)
                .collect();
            (!dates.is_empty()).then_some(QualityWarning::MissingValues { field, dates })
        })
        .collect()
}

/// Pass 4: resolve duplicated dates, keeping the first occurrence.
#[must_use]
pub fn drop_duplicate_dates(series: Vec<SeriesRow>) -> (Vec<SeriesRow>, Vec<QualityWarning>) {
    let mut seen = HashSet::new();
    let mut dropped = Vec::new();
    let mut kept = Vec::with_capacity(series.len());
    for row in series {
        if seen.insert(row.date) {
            kept.push(row);
        } else {
            dropped.push(row.date);
        }
    }
    let warnings = if dropped.is_empty() {
        vec![]
    } else {
        vec![QualityWarning::DuplicateDates(dropped)]
    };
    (kept, warnings)
}

/// Pass 5: report, per field, values outside the plausible range.
/// Flag-only: nothing is clamped or removed.
#[must_use]
pub fn check_bounds(series: &[SeriesRow]) -> Vec<QualityWarning> {
    TempField::ALL
        .into_iter()
        .filter_map(|field| {
            let dates: Vec<NaiveDate> = series
                .iter()
                .filter(|r| {
                    r.field(field)
                        .is_some_and(|v| !(SANE_MIN_TEMP..=SANE_MAX_TEMP).contains(&v))
                })
                .map(|r| r.date)
                .collect();
            (!dates.is_empty()).then_some(QualityWarning::OutOfRange { field, dates })
        })
        .collect()
}

/// Pass 6: report dates where the min/mean/max ordering is violated.
/// Flag-only; nothing is corrected.
#[must_use]
pub fn check_consistency(series: &[SeriesRow]) -> Vec<QualityWarning> {
    let dates: Vec<NaiveDate> = series
        .iter()
        .filter(|r| {
            let min_over_mean = matches!((r.t_min, r.t_mean), (Some(lo), Some(mid)) if lo > mid);
            let mean_over_max = matches!((r.t_mean, r.t_max), (Some(mid), Some(hi)) if mid > hi);
            min_over_mean || mean_over_max
        })
        .map(|r| r.date)
        .collect();

    if dates.is_empty() {
        vec![]
    } else {
        vec![QualityWarning::Inconsistent(dates)]
    }
}

/// Pass 7: fill missing values by linear interpolation over the date-ordered
/// sequence, independently per field. Runs touching either end of the series
/// have no neighbor on one side and stay unfilled.
#[must_use]
pub fn interpolate_gaps(mut series: Vec<SeriesRow>) -> Vec<SeriesRow> {
    for field in TempField::ALL {
        let column: Vec<Option<f64>> = series.iter().map(|r| r.field(field)).collect();
        let filled = interpolate_column(&column);
        for (row, value) in series.iter_mut().zip(filled) {
            row.set_field(field, value);
        }
    }
    series
}

fn interpolate_column(column: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = column.to_vec();
    let mut i = 0;
    while i < out.len() {
        if out[i].is_some() {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < out.len() && out[i].is_none() {
            i += 1;
        }
        let left = run_start
            .checked_sub(1)
            .and_then(|li| column[li].map(|v| (li, v)));
        let right = column.get(i).copied().flatten().map(|v| (i, v));
        if let (Some((li, lv)), Some((ri, rv))) = (left, right) {
            for k in run_start..i {
                let t = (k - li) as f64 / (ri - li) as f64;
                out[k] = Some(lv + (rv - lv) * t);
            }
        }
    }
    out
}

/// Convert a cleaned series into observations for one city.
///
/// Rows still holding a missing value (interpolation had no neighbor on one
/// side) cannot satisfy the persisted model and are dropped with a warning.
#[must_use]
pub fn into_observations(
    series: Vec<SeriesRow>,
    city: &str,
) -> (Vec<Observation>, Vec<QualityWarning>) {
    let mut observations = Vec::with_capacity(series.len());
    let mut dropped = Vec::new();
    for row in series {
        match (row.t_max, row.t_mean, row.t_min) {
            (Some(t_max), Some(t_mean), Some(t_min)) => observations.push(Observation {
                city: city.to_string(),
                date: row.date,
                t_max,
                t_mean,
                t_min,
            }),
            _ => dropped.push(row.date),
        }
    }
    let warnings = if dropped.is_empty() {
        vec![]
    } else {
        vec![QualityWarning::DroppedIncomplete(dropped)]
    };
    (observations, warnings)
}
