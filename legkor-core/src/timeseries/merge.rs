use std::collections::BTreeMap;

use crate::types::RawRow;

/// A single-variable column as decoded from one per-variable feed:
/// `(date stamp, raw value token)` pairs.
pub type RawColumn = Vec<(String, Option<String>)>;

/// Join the three per-variable historical feeds on their date stamp.
///
/// Only dates present in all three columns are kept (inner join). Within one
/// column, a duplicated date stamp keeps its first occurrence. Output is
/// ordered by date stamp; both feeds use `YYYYMMDD` stamps, so stamp order
/// is chronological order.
#[must_use]
pub fn join_columns(max: RawColumn, mean: RawColumn, min: RawColumn) -> Vec<RawRow> {
    let mean_map = first_wins(mean);
    let min_map = first_wins(min);

    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for (date, t_max) in max {
        if !seen.insert(date.clone()) {
            continue;
        }
        let (Some(t_mean), Some(t_min)) = (mean_map.get(&date), min_map.get(&date)) else {
            continue;
        };
        out.push(RawRow {
            date,
            t_max,
            t_mean: t_mean.clone(),
            t_min: t_min.clone(),
        });
    }
    out.sort_by(|a, b| a.date.cmp(&b.date));
    out
}

fn first_wins(column: RawColumn) -> BTreeMap<String, Option<String>> {
    let mut map = BTreeMap::new();
    for (date, value) in column {
        map.entry(date).or_insert(value);
    }
    map
}

/// Merge two date-keyed series, older source taking precedence.
///
/// For each date and each temperature field, the older series' non-missing
/// value wins; the recent series only fills true gaps and extends coverage.
/// Dates present only in the recent series are included with its values.
/// If neither side has a value the field stays missing for the cleaning
/// pipeline to deal with. Duplicate dates within one input keep their first
/// occurrence. The result covers the union of both date ranges, one row per
/// distinct date, in stamp order.
///
/// This is deliberately not a "later wins" merge: the older feed is the
/// authoritative homogenized series.
#[must_use]
pub fn combine_first(older: Vec<RawRow>, recent: Vec<RawRow>) -> Vec<RawRow> {
    let mut map: BTreeMap<String, RawRow> = BTreeMap::new();

    for row in older {
        map.entry(row.date.clone()).or_insert(row);
    }
    for row in recent {
        match map.entry(row.date.clone()) {
            std::collections::btree_map::Entry::Vacant(v) => {
                v.insert(row);
            }
            std::collections::btree_map::Entry::Occupied(mut o) => {
                let held = o.get_mut();
                if held.t_max.is_none() {
                    held.t_max = row.t_max;
                }
                if held.t_mean.is_none() {
                    held.t_mean = row.t_mean;
                }
                if held.t_min.is_none() {
                    held.t_min = row.t_min;
                }
            }
        }
    }

    map.into_values().collect()
}
