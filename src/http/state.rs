//! Application state for the HTTP server.

use std::sync::Arc;

use crate::catalog::AssetRegistry;
use crate::models::RegionOfInterest;
use crate::remote::client::GeoComputeClient;
use crate::remote::pipeline::PipelineConfig;

/// Shared application state passed to all handlers.
///
/// Everything here is read-only after startup: the registry is resolved
/// once, the region and pipeline constants are fixed for the session.
#[derive(Clone)]
pub struct AppState {
    /// Compute backend for remote operations
    pub client: Arc<dyn GeoComputeClient>,
    /// Resolved layer catalog
    pub registry: Arc<AssetRegistry>,
    /// Fixed region of interest
    pub region: Arc<RegionOfInterest>,
    /// Pipeline thresholds and band names
    pub pipeline_config: Arc<PipelineConfig>,
}

impl AppState {
    /// Create application state with the study-area defaults. The region is
    /// backed by the field-geometry asset the registry resolved at startup.
    pub fn new(client: Arc<dyn GeoComputeClient>, registry: AssetRegistry) -> Self {
        let region = RegionOfInterest::from_asset(
            "nalgonda_paddy_fields",
            registry.field_geometry().path.clone(),
        );
        Self {
            client,
            registry: Arc::new(registry),
            region: Arc::new(region),
            pipeline_config: Arc::new(PipelineConfig::default()),
        }
    }
}
