use chrono::NaiveDate;

use super::compute_series;
use crate::models::{DateRange, RegionOfInterest};
use crate::remote::backends::{LocalBackend, SyntheticScene};
use crate::remote::error::ServiceError;
use crate::remote::pipeline::PipelineConfig;

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, m, day).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

#[tokio::test]
async fn test_demo_window_series() {
    let backend = LocalBackend::with_demo_scenes();
    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();

    let series = compute_series(&backend, &config, &region, &range(d(1, 1), d(5, 31)))
        .await
        .unwrap();

    // 10 demo scenes: two above the cloud threshold, one fully masked.
    assert_eq!(series.len(), 7);
    for value in series.values() {
        assert!((-1.0..=1.0).contains(&value));
        assert!(value > 0.0, "vegetation NDVI should be positive");
    }
}

#[tokio::test]
async fn test_series_sorted_strictly_ascending() {
    let backend = LocalBackend::new();
    // Inserted out of order, with a duplicate date.
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(3, 20), 2.0, 0.6));
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(1, 4), 2.0, 0.2));
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(1, 4), 2.0, 0.4));
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 10), 2.0, 0.4));

    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let series = compute_series(&backend, &config, &region, &range(d(1, 1), d(6, 1)))
        .await
        .unwrap();

    let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![d(1, 4), d(2, 10), d(3, 20)]);
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_masked_scene_is_dropped() {
    let backend = LocalBackend::new();
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 1), 2.0, 0.4));
    backend.insert_scene(SyntheticScene::fully_masked(d(2, 15), 2.0));

    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let series = compute_series(&backend, &config, &region, &range(d(1, 1), d(3, 1)))
        .await
        .unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series.observations()[0].date, d(2, 1));
}

#[tokio::test]
async fn test_empty_window_yields_empty_series() {
    let backend = LocalBackend::with_demo_scenes();
    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();

    let series = compute_series(&backend, &config, &region, &range(d(6, 1), d(7, 1)))
        .await
        .unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let backend = LocalBackend::with_demo_scenes();
    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let window = range(d(1, 1), d(5, 31));

    let first = compute_series(&backend, &config, &region, &window).await.unwrap();
    let second = compute_series(&backend, &config, &region, &window).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_remote_failure_propagates() {
    let backend = LocalBackend::with_demo_scenes();
    backend.set_offline(true);
    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();

    let err = compute_series(&backend, &config, &region, &range(d(1, 1), d(5, 31)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn test_relaxed_cloud_threshold_keeps_more_scenes() {
    let backend = LocalBackend::with_demo_scenes();
    let region = RegionOfInterest::study_area();
    let window = range(d(1, 1), d(5, 31));

    let strict = PipelineConfig::default();
    let relaxed = PipelineConfig {
        cloud_cover_max_pct: 100.0,
        ..PipelineConfig::default()
    };

    let strict_series = compute_series(&backend, &strict, &region, &window).await.unwrap();
    let relaxed_series = compute_series(&backend, &relaxed, &region, &window).await.unwrap();
    assert!(relaxed_series.len() > strict_series.len());
}
