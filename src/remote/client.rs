//! Client trait for the remote geospatial compute service.
//!
//! This is the narrow boundary behind which all remote computation lives:
//! resolve a named asset to a handle, submit an aggregation pipeline, check
//! connectivity. Backends implement it for the real service and for the
//! in-memory test double.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ServiceResult;
use super::pipeline::AggregationPipeline;
use crate::api::AssetId;

/// What a remote asset is, as far as the dashboard cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// A raster image (classified map, threshold mask)
    Image,
    /// A vector feature collection (boundaries, field polygons)
    FeatureCollection,
}

/// An opaque reference to a remote raster/vector dataset.
///
/// Resolved once per process and reused for its lifetime; a new process is
/// required to pick up remote asset changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHandle {
    /// Remote asset path as published in the project
    pub path: String,
    /// Service-assigned identifier
    pub id: AssetId,
    pub kind: AssetKind,
}

/// One row of an aggregation result table.
///
/// `value` is `None` when every pixel of the scene was masked out over the
/// region (the remote reducer returns null for that date).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationRow {
    /// Acquisition date of the scene
    pub date: NaiveDate,
    /// Region-mean scalar, absent for fully masked scenes
    pub value: Option<f64>,
}

/// Narrow interface to the remote compute service.
///
/// One blocking call per user interaction; implementations must not retry on
/// failure, and must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait GeoComputeClient: Send + Sync {
    /// Resolve a published asset path to a handle.
    ///
    /// # Returns
    /// * `Ok(AssetHandle)` - Opaque handle for the asset
    /// * `Err(ServiceError::NotFound)` - Asset path is not published
    /// * `Err(ServiceError::ServiceUnavailable)` - Service unreachable
    async fn resolve_asset(&self, path: &str) -> ServiceResult<AssetHandle>;

    /// Submit an aggregation pipeline and return its result table.
    ///
    /// Row order is unspecified; callers sort. Failures (timeout, quota,
    /// auth) surface as `ServiceUnavailable` or `Authentication`, with no
    /// partial results.
    async fn submit_aggregation(
        &self,
        pipeline: &AggregationPipeline,
    ) -> ServiceResult<Vec<AggregationRow>>;

    /// Check connectivity to the service.
    async fn health_check(&self) -> ServiceResult<bool>;
}
