//! HTTP backend for the remote geospatial compute service.
//!
//! Opens a credentialed session (service-account key exchanged for a token,
//! or a pre-obtained access token), then issues one request per operation:
//! asset resolution, pipeline submission, health probe. No retries; failures
//! map onto the [`ServiceError`] taxonomy and surface to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::AssetId;
use crate::remote::client::{AggregationRow, AssetHandle, AssetKind, GeoComputeClient};
use crate::remote::config::{AuthMethod, RemoteConfig, COMPUTE_SCOPE};
use crate::remote::error::{ErrorContext, ServiceError, ServiceResult};
use crate::remote::pipeline::AggregationPipeline;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    id: String,
    #[serde(rename = "type")]
    kind: AssetKind,
}

#[derive(Debug, Deserialize)]
struct AggregationResponse {
    rows: Vec<AggregationRow>,
}

/// Client for the compute service's REST API.
pub struct EarthEngineBackend {
    http: reqwest::Client,
    config: RemoteConfig,
    access_token: String,
}

impl EarthEngineBackend {
    /// Open a session against the configured service.
    ///
    /// Fails with `Authentication` when the credential cannot be read or the
    /// token exchange is rejected; this is fatal for the process.
    pub async fn connect(config: RemoteConfig) -> ServiceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::configuration(format!("http client: {}", e)))?;

        let access_token = match &config.auth_method {
            AuthMethod::AccessToken(token) => token.clone(),
            AuthMethod::ServiceAccountKey(path) => {
                let key = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ServiceError::authentication_with_context(
                        format!("cannot read service-account key '{}': {}", path, e),
                        ErrorContext::new("connect"),
                    )
                })?;
                let key_json: serde_json::Value = serde_json::from_str(&key).map_err(|e| {
                    ServiceError::authentication_with_context(
                        format!("service-account key is not valid JSON: {}", e),
                        ErrorContext::new("connect"),
                    )
                })?;

                let url = format!("{}/v1/auth/token", config.base_url);
                let response = http
                    .post(&url)
                    .json(&serde_json::json!({
                        "key": key_json,
                        "scope": COMPUTE_SCOPE,
                    }))
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(ServiceError::authentication_with_context(
                        format!("token exchange rejected with status {}", response.status()),
                        ErrorContext::new("connect"),
                    ));
                }
                let token: TokenResponse = response.json().await?;
                token.access_token
            }
        };

        log::info!("opened compute-service session at {}", config.base_url);
        Ok(Self {
            http,
            config,
            access_token,
        })
    }

    fn api_url(&self, suffix: &str) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            self.config.base_url, self.config.project, suffix
        )
    }
}

#[async_trait]
impl GeoComputeClient for EarthEngineBackend {
    async fn resolve_asset(&self, path: &str) -> ServiceResult<AssetHandle> {
        let response = self
            .http
            .get(self.api_url("assets"))
            .query(&[("path", path)])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("resolve_asset"))?;

        if response.status().as_u16() == 404 {
            return Err(ServiceError::not_found_with_context(
                format!("asset '{}' is not published", path),
                ErrorContext::new("resolve_asset").with_entity("asset"),
            ));
        }
        if !response.status().is_success() {
            return Err(ServiceError::unavailable_with_context(
                format!("asset resolution failed with status {}", response.status()),
                ErrorContext::new("resolve_asset").with_entity_id(path),
            ));
        }

        let asset: AssetResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("resolve_asset"))?;
        Ok(AssetHandle {
            path: path.to_string(),
            id: AssetId::new(asset.id),
            kind: asset.kind,
        })
    }

    async fn submit_aggregation(
        &self,
        pipeline: &AggregationPipeline,
    ) -> ServiceResult<Vec<AggregationRow>> {
        let fingerprint = pipeline.fingerprint();
        log::debug!("submitting aggregation pipeline {}", &fingerprint[..16]);

        let response = self
            .http
            .post(self.api_url("aggregations:compute"))
            .bearer_auth(&self.access_token)
            .json(pipeline)
            .send()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("submit_aggregation"))?;

        if !response.status().is_success() {
            return Err(ServiceError::unavailable_with_context(
                format!("aggregation failed with status {}", response.status()),
                ErrorContext::new("submit_aggregation")
                    .with_entity("pipeline")
                    .with_entity_id(fingerprint),
            ));
        }

        let table: AggregationResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::from(e).with_operation("submit_aggregation"))?;
        Ok(table.rows)
    }

    async fn health_check(&self) -> ServiceResult<bool> {
        let url = format!("{}/v1/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}
