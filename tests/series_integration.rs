//! End-to-end series computation against the local backend.

#![cfg(feature = "local-backend")]

use chrono::NaiveDate;

use pfi_rust::models::{DateRange, RegionOfInterest};
use pfi_rust::remote::backends::{LocalBackend, SyntheticScene};
use pfi_rust::remote::error::ServiceError;
use pfi_rust::remote::pipeline::PipelineConfig;
use pfi_rust::services;

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, m, day).unwrap()
}

#[tokio::test]
async fn test_demo_season_series_and_statistics() {
    let backend = LocalBackend::with_demo_scenes();
    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let range = DateRange::new(d(1, 1), d(5, 31)).unwrap();

    let series = services::compute_series(&backend, &config, &region, &range)
        .await
        .unwrap();

    // Cloud filtering leaves 7 of the 10 demo passes.
    assert_eq!(series.len(), 7);
    let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    for value in series.values() {
        assert!((-1.0..=1.0).contains(&value));
    }

    let stats = services::summarize(&series).unwrap();
    assert!(stats.min <= stats.median && stats.median <= stats.max);
    assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    // Season peaks mid-campaign around 0.72.
    assert!((stats.max - 0.72).abs() < 0.01);
}

#[tokio::test]
async fn test_invalid_range_issues_no_request() {
    // An inverted range fails at construction, so there is nothing to
    // submit, even against an offline backend.
    let backend = LocalBackend::with_demo_scenes();
    backend.set_offline(true);

    let err = DateRange::new(d(6, 1), d(1, 1)).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRange { .. }));
}

#[tokio::test]
async fn test_empty_window_summarize_fails() {
    let backend = LocalBackend::with_demo_scenes();
    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let range = DateRange::new(d(11, 1), d(12, 1)).unwrap();

    let series = services::compute_series(&backend, &config, &region, &range)
        .await
        .unwrap();
    assert!(series.is_empty());

    let err = services::summarize(&series).unwrap_err();
    assert!(matches!(err, ServiceError::EmptySeries { .. }));
}

#[tokio::test]
async fn test_zero_valid_pixel_dates_are_omitted() {
    let backend = LocalBackend::new();
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 1), 2.0, 0.35));
    backend.insert_scene(SyntheticScene::fully_masked(d(2, 10), 2.0));
    backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 20), 2.0, 0.45));

    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let range = DateRange::new(d(1, 1), d(3, 1)).unwrap();

    let series = services::compute_series(&backend, &config, &region, &range)
        .await
        .unwrap();
    let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![d(2, 1), d(2, 20)]);
}

#[tokio::test]
async fn test_series_length_matches_cloud_filtered_passes() {
    let backend = LocalBackend::new();
    // Five passes, two above the 26% threshold.
    for (day, cloud) in [(1u32, 5.0), (7, 30.0), (13, 10.0), (19, 26.0), (25, 0.0)] {
        backend.insert_scene(SyntheticScene::with_mean_ndvi(d(3, day), cloud, 0.5));
    }

    let config = PipelineConfig::default();
    let region = RegionOfInterest::study_area();
    let range = DateRange::new(d(3, 1), d(4, 1)).unwrap();

    let series = services::compute_series(&backend, &config, &region, &range)
        .await
        .unwrap();
    assert_eq!(series.len(), 3);
}
