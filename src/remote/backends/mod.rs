//! Compute backend implementations.
//!
//! This module contains the implementations of the `GeoComputeClient` trait:
//! - `earth_engine`: HTTP client for the remote compute service
//! - `local`: In-memory implementation for unit testing and local development

#[cfg(feature = "ee-backend")]
pub mod earth_engine;
#[cfg(feature = "local-backend")]
pub mod local;

#[cfg(feature = "ee-backend")]
pub use earth_engine::EarthEngineBackend;
#[cfg(feature = "local-backend")]
pub use local::{LocalBackend, PixelSample, SyntheticScene};
