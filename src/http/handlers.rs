//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. One blocking remote call per request;
//! failures surface as structured errors, never as retries.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    DisplayQuery, HealthResponse, LayerDisplayResponse, LayerListResponse, SeriesQuery,
    SeriesResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::catalog::MapDefaults;
use crate::models::DateRange;
use crate::remote::error::ServiceError;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the remote
/// compute service is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let remote_status = match state.client.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        remote_service: remote_status,
    }))
}

// =============================================================================
// Layer Catalog
// =============================================================================

/// GET /v1/layers
///
/// List all catalog layers with display parameters and legends, plus the
/// initial map view.
pub async fn list_layers(State(state): State<AppState>) -> HandlerResult<LayerListResponse> {
    let layers = state.registry.layers().to_vec();
    let total = layers.len();

    Ok(Json(LayerListResponse {
        layers,
        total,
        map: MapDefaults::study_area(),
    }))
}

/// GET /v1/layers/{slug}/display
///
/// Display parameters for one layer at the requested opacity. The opacity
/// slider emits values in [0.0, 1.0]; 0.0 is valid and renders the layer
/// fully transparent over the visible base map.
pub async fn get_layer_display(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<DisplayQuery>,
) -> HandlerResult<LayerDisplayResponse> {
    let opacity = query.opacity.unwrap_or(1.0);
    if !(0.0..=1.0).contains(&opacity) {
        return Err(AppError::BadRequest(format!(
            "opacity must be within [0.0, 1.0], got {}",
            opacity
        )));
    }

    let layer = state.registry.get_by_slug(&slug)?;

    Ok(Json(LayerDisplayResponse {
        slug: layer.slug.clone(),
        title: layer.title.clone(),
        asset: layer.handle.clone(),
        display: layer.display.clone().with_opacity(opacity),
        legend: layer.legend.clone(),
        clip_to_boundary: layer.clip_to_boundary,
    }))
}

// =============================================================================
// NDVI Time Series
// =============================================================================

/// GET /v1/ndvi/series
///
/// Compute the NDVI time series over the study region for a date range and
/// summarize it. An invalid range is rejected before any remote call; an
/// empty result produces a "no data" payload rather than an error.
pub async fn get_ndvi_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> HandlerResult<SeriesResponse> {
    let defaults = DateRange::dashboard_default();
    let start = query.start.unwrap_or_else(|| defaults.start());
    let end = query.end.unwrap_or_else(|| defaults.end());

    // Rejecting here guarantees compute_series is never invoked with a bad
    // range.
    let range = DateRange::new(start, end)?;

    let series = services::compute_series(
        state.client.as_ref(),
        &state.pipeline_config,
        &state.region,
        &range,
    )
    .await?;

    let (statistics, message) = match services::summarize(&series) {
        Ok(stats) => (Some(stats), None),
        Err(ServiceError::EmptySeries { .. }) => (
            None,
            Some("No cloud-free observations in the selected date range.".to_string()),
        ),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(SeriesResponse {
        observations: series.observations().to_vec(),
        count: series.len(),
        statistics,
        statistics_display: statistics.map(|s| s.formatted()),
        message,
        chart_domain: [0.0, 1.0],
    }))
}
