//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The catalog and statistics types already derive Serialize/Deserialize and
//! are re-exported from the api module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Catalog
    AssetHandle,
    AssetKind,
    DisplayParams,
    LayerKind,
    LegendEntry,
    MapDefaults,
    ResolvedLayer,
    // Series
    FormattedStatistics,
    Observation,
    SeriesStatistics,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Remote compute-service connectivity
    pub remote_service: String,
}

/// Layer list response for the dashboard selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerListResponse {
    /// Layers in selector order
    pub layers: Vec<ResolvedLayer>,
    /// Total count
    pub total: usize,
    /// Initial map view
    pub map: MapDefaults,
}

/// Query parameters for the layer display endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayQuery {
    /// Layer opacity in [0.0, 1.0] (default: 1.0)
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// Display parameters for one selected layer at a chosen opacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDisplayResponse {
    pub slug: String,
    pub title: String,
    pub asset: AssetHandle,
    pub display: DisplayParams,
    pub legend: Vec<LegendEntry>,
    pub clip_to_boundary: bool,
}

/// Query parameters for the NDVI series endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeriesQuery {
    /// Start date, inclusive (default: 2019-01-01)
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// End date, exclusive (default: 2019-05-31)
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// NDVI time series with its statistics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesResponse {
    /// Observations sorted ascending by date
    pub observations: Vec<Observation>,
    /// Number of observations
    pub count: usize,
    /// Statistics over the values; absent when the series is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SeriesStatistics>,
    /// Two-decimal statistics for the metric cards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics_display: Option<FormattedStatistics>,
    /// Inline message when there is nothing to chart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Suggested chart y-domain (NDVI of vegetation sits in [0, 1])
    pub chart_domain: [f64; 2],
}
