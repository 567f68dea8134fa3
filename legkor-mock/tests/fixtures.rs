use chrono::NaiveDate;

use legkor_core::types::{Observation, ObservationFilter};
use legkor_core::{LegkorError, ObservationStore, WeatherSource};
use legkor_mock::{FAIL_CITY, FixtureSource, MemoryStore};

fn obs(day: u32, t_mean: f64) -> Observation {
    Observation {
        city: "Budapest".to_string(),
        date: NaiveDate::from_ymd_opt(2020, 1, day).unwrap(),
        t_max: t_mean + 2.0,
        t_mean,
        t_min: t_mean - 2.0,
    }
}

#[tokio::test]
async fn memory_store_honors_the_save_all_contract() {
    let store = MemoryStore::new();

    let report = store
        .save_all(vec![obs(1, 1.0), obs(2, 2.0)])
        .await
        .unwrap();
    assert_eq!(report.created, 2);

    // Replays reconcile to skips, like the real store.
    let replay = store.save_all(vec![obs(1, 1.0), obs(2, 2.0)]).await.unwrap();
    assert_eq!(replay.created, 0);
    assert_eq!(replay.skipped, 2);

    assert!(store.exists_for_city("Budapest").await.unwrap());
    assert_eq!(store.count(&ObservationFilter::default()).await.unwrap(), 2);

    let windowed = store
        .get(&ObservationFilter::for_city("Budapest").window(1, 1))
        .await
        .unwrap();
    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].t_mean, 2.0);
}

#[tokio::test]
async fn failing_store_rejects_writes() {
    let store = MemoryStore::failing();
    let err = store.save_all(vec![obs(1, 1.0)]).await.unwrap_err();
    assert!(matches!(err, LegkorError::Store(_)));
    assert!(store.dump().is_empty());
}

#[tokio::test]
async fn fixture_source_serves_its_canned_series() {
    let source = FixtureSource::budapest();
    assert_eq!(source.cities(), vec!["Budapest".to_string()]);

    let rows = source.daily_series("Budapest").await.unwrap();
    assert_eq!(rows[0].date, "20200101");

    let err = source.daily_series("Atlantis").await.unwrap_err();
    assert!(matches!(err, LegkorError::UnknownCity { .. }));

    let err = source.daily_series(FAIL_CITY).await.unwrap_err();
    assert!(err.is_retryable());
}
