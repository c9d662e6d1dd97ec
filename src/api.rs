//! Public API surface for the Rust backend.
//!
//! This file consolidates the identifier newtypes and re-exports the DTO
//! types used across the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.

pub use crate::catalog::AssetRegistry;
pub use crate::catalog::DisplayParams;
pub use crate::catalog::LayerKind;
pub use crate::catalog::LegendEntry;
pub use crate::catalog::MapDefaults;
pub use crate::catalog::ResolvedLayer;
pub use crate::models::DateRange;
pub use crate::models::NdviSeries;
pub use crate::models::Observation;
pub use crate::models::RegionOfInterest;
pub use crate::remote::client::AggregationRow;
pub use crate::remote::client::AssetHandle;
pub use crate::remote::client::AssetKind;
pub use crate::remote::pipeline::AggregationPipeline;
pub use crate::remote::pipeline::PipelineConfig;
pub use crate::remote::pipeline::PipelineStage;
pub use crate::services::statistics::FormattedStatistics;
pub use crate::services::statistics::SeriesStatistics;

use serde::{Deserialize, Serialize};

/// Service-assigned asset identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(value: impl Into<String>) -> Self {
        AssetId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}
