//! Remote compute service boundary.
//!
//! All heavy computation (cloud masking, NDVI, spatial reduction) is
//! delegated to a remote geospatial compute service consumed through a
//! narrow interface, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, server binary)            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - Business Logic             │
//! │  - Pipeline construction                                │
//! │  - Series post-processing and statistics                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Client Trait (client.rs) - Narrow Interface            │
//! │  resolve_asset / submit_aggregation / health_check      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────────────────┐
//!     │   EarthEngine backend    │  Local backend    │
//!     │   (HTTP, production)     │  (in-memory)      │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `client`: Trait definition for compute operations
//! - `pipeline`: Aggregation pipeline descriptions and fingerprints
//! - `backends::earth_engine`: HTTP implementation (feature `ee-backend`)
//! - `backends::local`: In-memory implementation for unit testing and local
//!   development (feature `local-backend`)
//! - `factory`: Factory for creating backend instances
//! - `config`: Environment-driven remote service configuration
//! - `error`: The crate-wide error taxonomy

// Feature flag priority: ee-backend > local-backend
// When multiple features are enabled (e.g., --all-features), the remote
// backend takes precedence.
#[cfg(not(any(feature = "ee-backend", feature = "local-backend")))]
compile_error!("Enable at least one compute backend feature.");

pub mod backends;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod pipeline;

#[cfg(feature = "local-backend")]
pub use backends::LocalBackend;
#[cfg(feature = "ee-backend")]
pub use backends::EarthEngineBackend;
pub use client::{AggregationRow, AssetHandle, AssetKind, GeoComputeClient};
pub use config::{AuthMethod, RemoteConfig};
pub use error::{ErrorContext, ServiceError, ServiceResult};
pub use factory::{BackendFactory, BackendType};
pub use pipeline::{AggregationPipeline, PipelineConfig, PipelineStage};
