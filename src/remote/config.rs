//! Remote compute service configuration and environment variable handling.

use std::env;

/// OAuth scope the session is restricted to. The dashboard needs nothing
/// beyond the compute service itself.
pub const COMPUTE_SCOPE: &str = "https://www.googleapis.com/auth/earthengine";

/// Authentication method used when opening a session with the compute service.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Service-account key file (JSON), exchanged for a session token.
    ServiceAccountKey(String),
    /// Pre-obtained access token provided via env var (interactive
    /// credential or external token broker).
    AccessToken(String),
}

/// Remote service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the compute service REST API
    pub base_url: String,
    /// Cloud project the published assets live in
    pub project: String,
    /// Authentication strategy resolved from env vars
    pub auth_method: AuthMethod,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Create a new remote configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `EE_PROJECT` (required): Cloud project holding the published assets
    /// - `EE_BASE_URL` (optional, default: `https://earthengine.googleapis.com`)
    /// - `EE_AUTH_METHOD` (optional): `service_account` | `access_token`
    ///   - defaults to `service_account` when `EE_SERVICE_ACCOUNT_KEY` is set,
    ///     otherwise `access_token`
    /// - `EE_SERVICE_ACCOUNT_KEY` (required for `service_account`): Path to
    ///   the JSON key file
    /// - `EE_ACCESS_TOKEN` (required for `access_token`)
    /// - `EE_TIMEOUT_SECS` (optional, default: 60)
    ///
    /// # Errors
    /// Returns an error if required variables are not set.
    pub fn from_env() -> Result<Self, String> {
        let project = env::var("EE_PROJECT")
            .map_err(|_| "EE_PROJECT environment variable not set".to_string())?;
        let base_url = env::var("EE_BASE_URL")
            .unwrap_or_else(|_| "https://earthengine.googleapis.com".to_string());
        let timeout_secs = env::var("EE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| "EE_TIMEOUT_SECS must be a valid number of seconds".to_string())?;

        let auth_method_env = env::var("EE_AUTH_METHOD").unwrap_or_else(|_| "".to_string());
        let key_path = env::var("EE_SERVICE_ACCOUNT_KEY").ok();

        let auth_method = match auth_method_env.to_lowercase().as_str() {
            "service_account" => {
                let path = key_path.ok_or_else(|| {
                    "EE_SERVICE_ACCOUNT_KEY must be set when EE_AUTH_METHOD=service_account"
                        .to_string()
                })?;
                AuthMethod::ServiceAccountKey(path)
            }
            "access_token" | "token" => {
                let token = env::var("EE_ACCESS_TOKEN").map_err(|_| {
                    "EE_ACCESS_TOKEN must be set when EE_AUTH_METHOD=access_token".to_string()
                })?;
                AuthMethod::AccessToken(token)
            }
            "" => {
                // Prefer the service-account key when one is configured.
                match key_path {
                    Some(path) => AuthMethod::ServiceAccountKey(path),
                    None => {
                        let token = env::var("EE_ACCESS_TOKEN").map_err(|_| {
                            "Set EE_SERVICE_ACCOUNT_KEY or EE_ACCESS_TOKEN".to_string()
                        })?;
                        AuthMethod::AccessToken(token)
                    }
                }
            }
            other => {
                return Err(format!(
                    "Unsupported EE_AUTH_METHOD '{}'. Use service_account or access_token.",
                    other
                ))
            }
        };

        Ok(Self {
            base_url,
            project,
            auth_method,
            timeout_secs,
        })
    }
}
