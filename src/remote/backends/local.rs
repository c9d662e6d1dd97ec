//! In-memory compute backend for unit testing and local development.
//!
//! Holds a synthetic Sentinel-2 scene store and interprets aggregation
//! pipelines against it, applying the same filter/mask/reduce semantics the
//! remote service applies to real imagery. This is a test double, not a
//! reimplementation of the service: scenes carry a handful of sampled pixels
//! rather than rasters, and every scene is assumed to intersect the study
//! region.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::api::AssetId;
use crate::remote::client::{AggregationRow, AssetHandle, AssetKind, GeoComputeClient};
use crate::remote::error::{ErrorContext, ServiceError, ServiceResult};
use crate::remote::pipeline::{AggregationPipeline, PipelineStage, CLOUDY_PIXEL_PERCENTAGE};

/// One sampled pixel of a synthetic scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Near-infrared reflectance
    pub nir: f64,
    /// Red reflectance
    pub red: f64,
    /// Cloud probability, 0-100
    pub cloud_prob: f64,
    /// Scene classification class (3 = shadow, 10 = cirrus)
    pub scene_class: u8,
}

impl PixelSample {
    /// A clear pixel with the given reflectances.
    pub fn clear(nir: f64, red: f64) -> Self {
        Self {
            nir,
            red,
            cloud_prob: 0.0,
            scene_class: 4,
        }
    }
}

/// One synthetic satellite pass over the study region.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticScene {
    /// Acquisition date
    pub date: NaiveDate,
    /// Scene-level cloud percentage metadata
    pub cloudy_pixel_percentage: f64,
    /// Sampled pixels inside the region
    pub samples: Vec<PixelSample>,
}

impl SyntheticScene {
    /// A mostly-clear scene whose valid pixels average to roughly
    /// `mean_ndvi`.
    pub fn with_mean_ndvi(date: NaiveDate, cloudy_pixel_percentage: f64, mean_ndvi: f64) -> Self {
        // red fixed, nir solved from ndvi = (nir - red) / (nir + red)
        let red = 0.12;
        let sample = |ndvi: f64| {
            let nir = red * (1.0 + ndvi) / (1.0 - ndvi);
            PixelSample::clear(nir, red)
        };
        let spread = 0.02;
        Self {
            date,
            cloudy_pixel_percentage,
            samples: vec![
                sample(mean_ndvi - spread),
                sample(mean_ndvi),
                sample(mean_ndvi),
                sample(mean_ndvi + spread),
            ],
        }
    }

    /// A scene whose every pixel fails the validity mask.
    pub fn fully_masked(date: NaiveDate, cloudy_pixel_percentage: f64) -> Self {
        Self {
            date,
            cloudy_pixel_percentage,
            samples: vec![
                PixelSample {
                    nir: 0.3,
                    red: 0.1,
                    cloud_prob: 95.0,
                    scene_class: 4,
                },
                PixelSample {
                    nir: 0.3,
                    red: 0.1,
                    cloud_prob: 0.0,
                    scene_class: 3,
                },
                PixelSample {
                    nir: 0.3,
                    red: 0.1,
                    cloud_prob: 0.0,
                    scene_class: 10,
                },
            ],
        }
    }
}

/// In-memory implementation of [`GeoComputeClient`].
pub struct LocalBackend {
    scenes: RwLock<Vec<SyntheticScene>>,
    published: RwLock<HashMap<String, AssetKind>>,
    offline: RwLock<bool>,
}

impl LocalBackend {
    /// Create an empty backend with the study assets published.
    pub fn new() -> Self {
        Self::with_published(crate::catalog::published_assets())
    }

    /// Create an empty backend with only the given assets published.
    pub fn with_published<'a, I>(assets: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, AssetKind)>,
    {
        let published: HashMap<String, AssetKind> = assets
            .into_iter()
            .map(|(path, kind)| (path.to_string(), kind))
            .collect();
        Self {
            scenes: RwLock::new(Vec::new()),
            published: RwLock::new(published),
            offline: RwLock::new(false),
        }
    }

    /// Backend seeded with a deterministic 2019 Rabi-season scene set:
    /// clear passes with NDVI rising through the season, two passes above
    /// the cloud-cover threshold and one fully masked pass.
    pub fn with_demo_scenes() -> Self {
        let backend = Self::new();
        let date = |m: u32, d: u32| NaiveDate::from_ymd_opt(2019, m, d).unwrap_or_default();
        let scenes = vec![
            SyntheticScene::with_mean_ndvi(date(1, 4), 4.0, 0.21),
            SyntheticScene::with_mean_ndvi(date(1, 19), 12.0, 0.28),
            SyntheticScene::with_mean_ndvi(date(2, 3), 40.0, 0.30), // discarded: cloud cover
            SyntheticScene::with_mean_ndvi(date(2, 18), 8.0, 0.42),
            SyntheticScene::fully_masked(date(3, 5), 22.0), // dropped: zero valid pixels
            SyntheticScene::with_mean_ndvi(date(3, 20), 3.0, 0.61),
            SyntheticScene::with_mean_ndvi(date(4, 4), 17.0, 0.72),
            SyntheticScene::with_mean_ndvi(date(4, 19), 65.0, 0.70), // discarded: cloud cover
            SyntheticScene::with_mean_ndvi(date(5, 4), 6.0, 0.66),
            SyntheticScene::with_mean_ndvi(date(5, 19), 2.0, 0.55),
        ];
        for scene in scenes {
            backend.insert_scene(scene);
        }
        backend
    }

    /// Add a scene to the store.
    pub fn insert_scene(&self, scene: SyntheticScene) {
        self.scenes.write().push(scene);
    }

    /// Publish an additional asset path.
    pub fn publish_asset(&self, path: impl Into<String>, kind: AssetKind) {
        self.published.write().insert(path.into(), kind);
    }

    /// Simulate the service being unreachable.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.write() = offline;
    }

    fn ensure_online(&self, operation: &str) -> ServiceResult<()> {
        if *self.offline.read() {
            return Err(ServiceError::unavailable_with_context(
                "local backend is offline",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn interpret(&self, pipeline: &AggregationPipeline) -> ServiceResult<Vec<AggregationRow>> {
        let mut date_window: Option<(NaiveDate, NaiveDate)> = None;
        let mut cloud_cover_max: Option<f64> = None;
        let mut mask: Option<(f64, Vec<u8>)> = None;
        let mut has_normalized_difference = false;
        let mut has_reduce = false;

        for stage in pipeline.stages() {
            match stage {
                // Synthetic scenes all lie inside the study region.
                PipelineStage::FilterBounds { .. } => {}
                PipelineStage::FilterDate { start, end } => {
                    date_window = Some((*start, *end));
                }
                PipelineStage::FilterMetadataLt { property, value } => {
                    if property == CLOUDY_PIXEL_PERCENTAGE {
                        cloud_cover_max = Some(*value);
                    }
                }
                PipelineStage::MaskInvalidPixels {
                    cloud_prob_max,
                    excluded_classes,
                    ..
                } => {
                    mask = Some((*cloud_prob_max, excluded_classes.clone()));
                }
                PipelineStage::NormalizedDifference { .. } => {
                    has_normalized_difference = true;
                }
                PipelineStage::ReduceRegionMean { .. } => {
                    has_reduce = true;
                }
            }
        }

        let (start, end) = date_window.ok_or_else(|| {
            ServiceError::internal_with_context(
                "pipeline has no date filter",
                ErrorContext::new("submit_aggregation").with_entity("pipeline"),
            )
        })?;
        if !has_normalized_difference || !has_reduce {
            return Err(ServiceError::internal_with_context(
                "pipeline is not a normalized-difference region mean",
                ErrorContext::new("submit_aggregation")
                    .with_entity("pipeline")
                    .with_entity_id(pipeline.fingerprint()),
            ));
        }

        let scenes = self.scenes.read();
        let mut rows = Vec::new();
        for scene in scenes.iter() {
            if scene.date < start || scene.date >= end {
                continue;
            }
            if let Some(max) = cloud_cover_max {
                if scene.cloudy_pixel_percentage >= max {
                    continue;
                }
            }

            let valid = scene.samples.iter().filter(|s| match &mask {
                Some((prob_max, excluded)) => {
                    s.cloud_prob < *prob_max && !excluded.contains(&s.scene_class)
                }
                None => true,
            });

            let ndvi: Vec<f64> = valid
                .filter(|s| s.nir + s.red != 0.0)
                .map(|s| (s.nir - s.red) / (s.nir + s.red))
                .collect();

            let value = if ndvi.is_empty() {
                None
            } else {
                Some(ndvi.iter().sum::<f64>() / ndvi.len() as f64)
            };
            rows.push(AggregationRow {
                date: scene.date,
                value,
            });
        }

        Ok(rows)
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoComputeClient for LocalBackend {
    async fn resolve_asset(&self, path: &str) -> ServiceResult<AssetHandle> {
        self.ensure_online("resolve_asset")?;

        let kind = self.published.read().get(path).copied().ok_or_else(|| {
            ServiceError::not_found_with_context(
                format!("asset '{}' is not published", path),
                ErrorContext::new("resolve_asset").with_entity("asset"),
            )
        })?;

        // Deterministic local id derived from the path.
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Ok(AssetHandle {
            path: path.to_string(),
            id: AssetId::new(format!("local/{}", &digest[..16])),
            kind,
        })
    }

    async fn submit_aggregation(
        &self,
        pipeline: &AggregationPipeline,
    ) -> ServiceResult<Vec<AggregationRow>> {
        self.ensure_online("submit_aggregation")?;
        self.interpret(pipeline)
    }

    async fn health_check(&self) -> ServiceResult<bool> {
        Ok(!*self.offline.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, RegionOfInterest};
    use crate::remote::pipeline::PipelineConfig;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, m, day).unwrap()
    }

    fn pipeline(start: NaiveDate, end: NaiveDate) -> AggregationPipeline {
        AggregationPipeline::ndvi_mean_series(
            &PipelineConfig::default(),
            &RegionOfInterest::study_area(),
            &DateRange::new(start, end).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_resolve_known_asset() {
        let backend = LocalBackend::new();
        let handle = backend
            .resolve_asset("projects/ee-unipvgee/assets/RF_Classified_Image")
            .await
            .unwrap();
        assert_eq!(handle.kind, AssetKind::Image);
        assert!(handle.id.value().starts_with("local/"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_asset_not_found() {
        let backend = LocalBackend::new();
        let err = backend.resolve_asset("projects/nowhere/assets/missing").await;
        assert!(matches!(err, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_offline_backend_is_unavailable() {
        let backend = LocalBackend::with_demo_scenes();
        backend.set_offline(true);
        assert!(!backend.health_check().await.unwrap());
        let err = backend
            .resolve_asset("projects/ee-unipvgee/assets/RF_Classified_Image")
            .await;
        assert!(matches!(err, Err(ServiceError::ServiceUnavailable { .. })));
        let err = backend.submit_aggregation(&pipeline(d(1, 1), d(6, 1))).await;
        assert!(matches!(err, Err(ServiceError::ServiceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_cloudy_scenes_are_discarded() {
        let backend = LocalBackend::new();
        backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 1), 5.0, 0.4));
        backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 10), 26.0, 0.4));
        backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 20), 80.0, 0.4));

        let rows = backend
            .submit_aggregation(&pipeline(d(1, 1), d(3, 1)))
            .await
            .unwrap();
        // 26.0 is not strictly below the threshold, so only one scene remains.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, d(2, 1));
    }

    #[tokio::test]
    async fn test_fully_masked_scene_yields_null_value() {
        let backend = LocalBackend::new();
        backend.insert_scene(SyntheticScene::fully_masked(d(2, 1), 5.0));

        let rows = backend
            .submit_aggregation(&pipeline(d(1, 1), d(3, 1)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, None);
    }

    #[tokio::test]
    async fn test_masked_pixels_excluded_from_mean() {
        let backend = LocalBackend::new();
        let mut scene = SyntheticScene::with_mean_ndvi(d(2, 1), 5.0, 0.4);
        // A wildly different pixel that must be ignored (cloud shadow).
        scene.samples.push(PixelSample {
            nir: 0.9,
            red: 0.01,
            cloud_prob: 0.0,
            scene_class: 3,
        });
        backend.insert_scene(scene);

        let rows = backend
            .submit_aggregation(&pipeline(d(1, 1), d(3, 1)))
            .await
            .unwrap();
        let value = rows[0].value.unwrap();
        assert!((value - 0.4).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_date_window_is_half_open() {
        let backend = LocalBackend::new();
        backend.insert_scene(SyntheticScene::with_mean_ndvi(d(2, 1), 5.0, 0.4));
        backend.insert_scene(SyntheticScene::with_mean_ndvi(d(3, 1), 5.0, 0.5));

        let rows = backend
            .submit_aggregation(&pipeline(d(2, 1), d(3, 1)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, d(2, 1));
    }

    #[tokio::test]
    async fn test_demo_scene_values_in_ndvi_range() {
        let backend = LocalBackend::with_demo_scenes();
        let rows = backend
            .submit_aggregation(&pipeline(d(1, 1), d(6, 1)))
            .await
            .unwrap();
        assert!(!rows.is_empty());
        for row in rows.iter().filter_map(|r| r.value) {
            assert!((-1.0..=1.0).contains(&row));
        }
    }
}
