use crate::types::{Observation, RollingPoint};

/// Compute trailing moving averages over a window of days.
///
/// Input is sorted by date before aggregating. For each of the three fields
/// the mean is taken over the trailing `window` points; near the start of
/// the series the window shrinks to however many points actually exist
/// (minimum 1), so every input date yields a point and the first point's
/// average equals its own value. Empty input yields an empty result.
///
/// `window` must be at least 1; the caller validates it (see the facade's
/// `rolling_average`).
#[must_use]
pub fn rolling_mean(observations: &[Observation], window: usize) -> Vec<RollingPoint> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by_key(|o| o.date);

    let mut out = Vec::with_capacity(sorted.len());
    for (i, obs) in sorted.iter().enumerate() {
        let start = (i + 1).saturating_sub(window);
        let tail = &sorted[start..=i];
        let n = tail.len() as f64;
        out.push(RollingPoint {
            date: obs.date,
            t_max_avg: tail.iter().map(|o| o.t_max).sum::<f64>() / n,
            t_mean_avg: tail.iter().map(|o| o.t_mean).sum::<f64>() / n,
            t_min_avg: tail.iter().map(|o| o.t_min).sum::<f64>() / n,
        });
    }
    out
}
