//! Aggregation pipeline descriptions submitted to the remote compute service.
//!
//! A pipeline is a collection id plus an ordered list of filter/mask/compute/
//! reduce stages. The remote service executes the stages; nothing here
//! evaluates imagery. Stage order matters and is fixed by
//! [`AggregationPipeline::ndvi_mean_series`]: equivalent inputs must produce
//! byte-identical pipeline descriptions (and therefore identical remote
//! results against an unchanged dataset).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{DateRange, RegionOfInterest};

/// Sentinel-2 surface-reflectance harmonized collection.
pub const SENTINEL2_SR_COLLECTION: &str = "COPERNICUS/S2_SR_HARMONIZED";

/// Scene metadata property carrying the scene-level cloud percentage.
pub const CLOUDY_PIXEL_PERCENTAGE: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Tunable constants of the NDVI pipeline.
///
/// The thresholds are configuration, not structural invariants: the defaults
/// reproduce the published study (cloud cover < 26%, cloud probability < 10,
/// 20 m sampling scale, Sentinel-2 band names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Image collection to query
    pub collection: String,
    /// Scene-level cloud-cover filter, exclusive upper bound in percent
    pub cloud_cover_max_pct: f64,
    /// Per-pixel cloud-probability bound, exclusive
    pub cloud_prob_max: f64,
    /// Sampling scale for the spatial reduction, in meters
    pub scale_m: f64,
    /// Near-infrared band name
    pub nir_band: String,
    /// Red band name
    pub red_band: String,
    /// Per-pixel cloud-probability band name
    pub cloud_prob_band: String,
    /// Scene-classification band name
    pub scene_class_band: String,
    /// Scene class excluded as cloud shadow
    pub shadow_class: u8,
    /// Scene class excluded as cirrus
    pub cirrus_class: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: SENTINEL2_SR_COLLECTION.to_string(),
            cloud_cover_max_pct: 26.0,
            cloud_prob_max: 10.0,
            scale_m: 20.0,
            nir_band: "B8".to_string(),
            red_band: "B4".to_string(),
            cloud_prob_band: "MSK_CLDPRB".to_string(),
            scene_class_band: "SCL".to_string(),
            shadow_class: 3,
            cirrus_class: 10,
        }
    }
}

/// One stage of a server-side aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum PipelineStage {
    /// Keep scenes intersecting the region geometry.
    FilterBounds { region: serde_json::Value },
    /// Keep scenes acquired within `[start, end)`.
    FilterDate { start: NaiveDate, end: NaiveDate },
    /// Keep scenes whose metadata property is strictly below the bound.
    FilterMetadataLt { property: String, value: f64 },
    /// Mask pixels: valid iff cloud probability is strictly below the bound
    /// and the scene class is none of the excluded classes.
    MaskInvalidPixels {
        cloud_prob_band: String,
        cloud_prob_max: f64,
        scene_class_band: String,
        excluded_classes: Vec<u8>,
    },
    /// Per valid pixel, compute `(nir - red) / (nir + red)`.
    NormalizedDifference { nir_band: String, red_band: String },
    /// Spatially average the computed band over the region at the given
    /// scale, one scalar per scene (null if no valid pixel intersected).
    ReduceRegionMean {
        region: serde_json::Value,
        scale_m: f64,
    },
}

/// An ordered aggregation pipeline over an image collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationPipeline {
    collection: String,
    stages: Vec<PipelineStage>,
}

impl AggregationPipeline {
    /// Build the mean-NDVI-per-date pipeline for a region and date range.
    ///
    /// Stage order is load-bearing and mirrors the published processing
    /// chain: bounds filter, date filter, scene cloud-cover filter, pixel
    /// validity mask, normalized difference, per-scene region mean.
    pub fn ndvi_mean_series(
        config: &PipelineConfig,
        region: &RegionOfInterest,
        range: &DateRange,
    ) -> Self {
        let geometry = region.to_geometry();
        Self {
            collection: config.collection.clone(),
            stages: vec![
                PipelineStage::FilterBounds {
                    region: geometry.clone(),
                },
                PipelineStage::FilterDate {
                    start: range.start(),
                    end: range.end(),
                },
                PipelineStage::FilterMetadataLt {
                    property: CLOUDY_PIXEL_PERCENTAGE.to_string(),
                    value: config.cloud_cover_max_pct,
                },
                PipelineStage::MaskInvalidPixels {
                    cloud_prob_band: config.cloud_prob_band.clone(),
                    cloud_prob_max: config.cloud_prob_max,
                    scene_class_band: config.scene_class_band.clone(),
                    excluded_classes: vec![config.shadow_class, config.cirrus_class],
                },
                PipelineStage::NormalizedDifference {
                    nir_band: config.nir_band.clone(),
                    red_band: config.red_band.clone(),
                },
                PipelineStage::ReduceRegionMean {
                    region: geometry,
                    scale_m: config.scale_m,
                },
            ],
        }
    }

    /// Collection id the pipeline runs over.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Stages in submission order.
    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// SHA-256 fingerprint of the serialized pipeline.
    ///
    /// Struct fields serialize in declaration order, so equivalent pipelines
    /// fingerprint identically. Used as a stable request id in logs.
    pub fn fingerprint(&self) -> String {
        let serialized = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());
        hex::encode(hasher.finalize())
    }
}
