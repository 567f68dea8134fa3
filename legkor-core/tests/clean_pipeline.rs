use chrono::NaiveDate;
use legkor_core::timeseries::clean::{
    QualityWarning, check_bounds, check_consistency, check_missing_dates, clean,
    drop_duplicate_dates, interpolate_gaps, into_observations, normalize_types,
};
use legkor_core::types::{RawRow, SeriesRow, TempField};
use legkor_core::LegkorError;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
}

fn raw(date: &str, t_max: &str, t_mean: &str, t_min: &str) -> RawRow {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
    RawRow {
        date: date.to_string(),
        t_max: opt(t_max),
        t_mean: opt(t_mean),
        t_min: opt(t_min),
    }
}

fn typed(d: u32, t_max: Option<f64>, t_mean: Option<f64>, t_min: Option<f64>) -> SeriesRow {
    SeriesRow {
        date: day(d),
        t_max,
        t_mean,
        t_min,
    }
}

#[test]
fn non_numeric_tokens_become_missing_not_errors() {
    let series = normalize_types(vec![raw("20200101", "n/a", "3.5", "")]).unwrap();
    assert_eq!(series[0].t_max, None);
    assert_eq!(series[0].t_mean, Some(3.5));
    assert_eq!(series[0].t_min, None);
}

#[test]
fn unparseable_date_stamp_is_fatal() {
    let err = normalize_types(vec![raw("not-a-date", "1.0", "1.0", "1.0")]).unwrap_err();
    assert!(matches!(err, LegkorError::Data(_)));
}

#[test]
fn dashed_date_stamps_are_accepted() {
    let series = normalize_types(vec![raw("2020-01-05", "1.0", "1.0", "1.0")]).unwrap();
    assert_eq!(series[0].date, day(5));
}

#[test]
fn missing_dates_are_reported_not_inserted() {
    let series = vec![
        typed(1, Some(1.0), Some(1.0), Some(1.0)),
        typed(4, Some(1.0), Some(1.0), Some(1.0)),
    ];
    let warnings = check_missing_dates(&series);
    assert_eq!(warnings, vec![QualityWarning::MissingDates(vec![day(2), day(3)])]);
    assert_eq!(series.len(), 2);
}

#[test]
fn duplicate_dates_keep_first_occurrence() {
    let series = vec![
        typed(1, Some(1.0), Some(1.0), Some(1.0)),
        typed(1, Some(9.0), Some(9.0), Some(9.0)),
        typed(2, Some(2.0), Some(2.0), Some(2.0)),
    ];
    let (kept, warnings) = drop_duplicate_dates(series);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].t_max, Some(1.0));
    assert_eq!(warnings, vec![QualityWarning::DuplicateDates(vec![day(1)])]);
}

#[test]
fn out_of_range_values_are_flagged_never_clamped() {
    let series = vec![typed(1, Some(75.0), Some(10.0), Some(-60.0))];
    let warnings = check_bounds(&series);
    assert_eq!(warnings.len(), 2);
    assert!(warnings.contains(&QualityWarning::OutOfRange {
        field: TempField::Max,
        dates: vec![day(1)],
    }));
    assert!(warnings.contains(&QualityWarning::OutOfRange {
        field: TempField::Min,
        dates: vec![day(1)],
    }));
    // The pass never mutates.
    assert_eq!(series[0].t_max, Some(75.0));
}

#[test]
fn inconsistent_ordering_is_flagged() {
    let series = vec![
        typed(1, Some(5.0), Some(8.0), Some(1.0)),  // mean > max
        typed(2, Some(5.0), Some(3.0), Some(4.0)),  // min > mean
        typed(3, Some(5.0), Some(3.0), Some(1.0)),  // fine
    ];
    let warnings = check_consistency(&series);
    assert_eq!(warnings, vec![QualityWarning::Inconsistent(vec![day(1), day(2)])]);
}

#[test]
fn isolated_gap_interpolates_to_linear_midpoint() {
    let series = vec![
        typed(1, Some(2.0), Some(1.0), Some(0.0)),
        typed(2, None, None, None),
        typed(3, Some(6.0), Some(3.0), Some(2.0)),
    ];
    let filled = interpolate_gaps(series);
    assert_eq!(filled[1].t_max, Some(4.0));
    assert_eq!(filled[1].t_mean, Some(2.0));
    assert_eq!(filled[1].t_min, Some(1.0));
}

#[test]
fn multi_point_gap_interpolates_evenly() {
    let series = vec![
        typed(1, Some(0.0), Some(0.0), Some(0.0)),
        typed(2, None, Some(1.0), None),
        typed(3, None, Some(2.0), None),
        typed(4, Some(9.0), Some(3.0), Some(3.0)),
    ];
    let filled = interpolate_gaps(series);
    assert_eq!(filled[1].t_max, Some(3.0));
    assert_eq!(filled[2].t_max, Some(6.0));
    // Already-present values stay put.
    assert_eq!(filled[1].t_mean, Some(1.0));
}

#[test]
fn one_sided_endpoints_stay_unfilled() {
    let series = vec![
        typed(1, None, Some(1.0), Some(0.0)),
        typed(2, Some(5.0), Some(2.0), Some(1.0)),
        typed(3, None, Some(3.0), None),
    ];
    let filled = interpolate_gaps(series);
    assert_eq!(filled[0].t_max, None);
    assert_eq!(filled[2].t_max, None);
    assert_eq!(filled[2].t_min, None);
}

#[test]
fn conversion_drops_incomplete_rows_with_warning() {
    let series = vec![
        typed(1, None, Some(1.0), Some(0.0)),
        typed(2, Some(5.0), Some(2.0), Some(1.0)),
    ];
    let (observations, warnings) = into_observations(series, "Budapest");
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].city, "Budapest");
    assert_eq!(observations[0].date, day(2));
    assert_eq!(warnings, vec![QualityWarning::DroppedIncomplete(vec![day(1)])]);
}

#[test]
fn full_pipeline_orders_passes_correctly() {
    // A duplicate date, a value gap, and an out-of-range value together:
    // dedup must run before interpolation, and the out-of-range flag must
    // refer to the surviving rows.
    let rows = vec![
        raw("20200101", "2.0", "1.0", "0.0"),
        raw("20200102", "", "bad", "1.0"),
        raw("20200102", "9.9", "9.9", "9.9"),
        raw("20200103", "6.0", "3.0", "2.0"),
        raw("20200104", "80.0", "3.0", "2.0"),
    ];
    let (series, warnings) = clean(rows).unwrap();

    assert_eq!(series.len(), 4);
    // The first 2020-01-02 row survived and its gaps were interpolated from
    // its neighbors, not from the dropped duplicate.
    assert_eq!(series[1].t_max, Some(4.0));
    assert_eq!(series[1].t_mean, Some(2.0));
    assert_eq!(series[1].t_min, Some(1.0));

    assert!(warnings.iter().any(|w| matches!(w, QualityWarning::DuplicateDates(d) if d == &vec![day(2)])));
    assert!(warnings.iter().any(|w| matches!(
        w,
        QualityWarning::OutOfRange { field: TempField::Max, dates } if dates == &vec![day(4)]
    )));
    assert!(warnings.iter().any(|w| matches!(
        w,
        QualityWarning::MissingValues { field: TempField::Mean, dates } if dates == &vec![day(2)]
    )));
}
