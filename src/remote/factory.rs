//! Backend factory for dependency injection.
//!
//! This module provides utilities for creating compute-backend instances
//! based on runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "local-backend")]
use super::backends::LocalBackend;
#[cfg(feature = "ee-backend")]
use super::backends::EarthEngineBackend;
use super::client::GeoComputeClient;
use super::config::RemoteConfig;
use super::error::{ServiceError, ServiceResult};

/// Compute backend type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// HTTP client for the remote compute service
    EarthEngine,
    /// In-memory local backend
    Local,
}

impl FromStr for BackendType {
    type Err = String;

    /// Parse backend type from string ("earth_engine", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "earth_engine" | "ee" | "remote" => Ok(Self::EarthEngine),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown backend type: {}", s)),
        }
    }
}

impl BackendType {
    /// Get backend type from environment.
    ///
    /// Reads `COMPUTE_BACKEND`. Defaults to EarthEngine when a project is
    /// configured, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("COMPUTE_BACKEND") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("EE_PROJECT").is_ok() {
            Self::EarthEngine
        } else {
            Self::Local
        }
    }
}

/// Factory for creating compute-backend instances.
///
/// # Example
/// ```ignore
/// use pfi_rust::remote::{BackendFactory, BackendType, RemoteConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RemoteConfig::from_env()?;
///     let _remote = BackendFactory::create(BackendType::EarthEngine, Some(&config)).await?;
///
///     let _local = BackendFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend instance based on type.
    ///
    /// # Arguments
    /// * `backend_type` - Type of backend to create
    /// * `remote_config` - Remote configuration (required for EarthEngine)
    pub async fn create(
        backend_type: BackendType,
        remote_config: Option<&RemoteConfig>,
    ) -> ServiceResult<Arc<dyn GeoComputeClient>> {
        match backend_type {
            BackendType::EarthEngine => {
                #[cfg(feature = "ee-backend")]
                {
                    let config = remote_config.ok_or_else(|| {
                        ServiceError::configuration(
                            "EarthEngine backend requires RemoteConfig".to_string(),
                        )
                    })?;
                    let backend = Self::create_earth_engine(config).await?;
                    Ok(backend as Arc<dyn GeoComputeClient>)
                }
                #[cfg(not(feature = "ee-backend"))]
                {
                    let _ = remote_config;
                    Err(ServiceError::configuration(
                        "EarthEngine backend feature not enabled".to_string(),
                    ))
                }
            }
            BackendType::Local => {
                #[cfg(feature = "local-backend")]
                {
                    Ok(Self::create_local())
                }
                #[cfg(not(feature = "local-backend"))]
                {
                    Err(ServiceError::configuration(
                        "Local backend feature not enabled".to_string(),
                    ))
                }
            }
        }
    }

    /// Create the remote compute backend and open its session.
    #[cfg(feature = "ee-backend")]
    pub async fn create_earth_engine(
        config: &RemoteConfig,
    ) -> ServiceResult<Arc<EarthEngineBackend>> {
        let backend = EarthEngineBackend::connect(config.clone()).await?;
        Ok(Arc::new(backend))
    }

    /// Create a local backend seeded with the demo scene set.
    #[cfg(feature = "local-backend")]
    pub fn create_local() -> Arc<dyn GeoComputeClient> {
        Arc::new(LocalBackend::with_demo_scenes())
    }
}
