//! Backend payments API configuration.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Where the backend API lives and how the single-tenant credentials are found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the payments API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Inline API key id. Prefer `key_id_env` outside of local development.
    #[serde(default)]
    pub key_id: Option<String>,

    /// Inline API key secret.
    #[serde(default)]
    pub key_secret: Option<String>,

    /// Environment variable holding the key id.
    #[serde(default = "default_key_id_env")]
    pub key_id_env: String,

    /// Environment variable holding the key secret.
    #[serde(default = "default_key_secret_env")]
    pub key_secret_env: String,

    /// Per-request timeout for backend calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// A key id / secret pair resolved from config or environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub key_id: String,
    pub key_secret: String,
}

impl std::fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key_id: None,
            key_secret: None,
            key_id_env: default_key_id_env(),
            key_secret_env: default_key_secret_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Resolve credentials: inline values first, then the configured env vars.
    ///
    /// Returns `Ok(None)` when neither half is configured anywhere, and an
    /// error when only one half is.
    pub fn resolve_credentials(&self) -> Result<Option<ResolvedCredentials>, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve_credentials`](Self::resolve_credentials) with an
    /// injectable environment lookup.
    pub fn resolve_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<ResolvedCredentials>, ConfigError> {
        let key_id = non_empty(self.key_id.clone()).or_else(|| non_empty(env(&self.key_id_env)));
        let key_secret =
            non_empty(self.key_secret.clone()).or_else(|| non_empty(env(&self.key_secret_env)));

        match (key_id, key_secret) {
            (Some(key_id), Some(key_secret)) => Ok(Some(ResolvedCredentials { key_id, key_secret })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::Config(format!(
                "API key id is set but the secret is missing (set api.key_secret or {})",
                self.key_secret_env
            ))),
            (None, Some(_)) => Err(ConfigError::Config(format!(
                "API key secret is set but the key id is missing (set api.key_id or {})",
                self.key_id_env
            ))),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_base_url() -> String {
    "https://api.razorpay.com/v1".to_string()
}

fn default_key_id_env() -> String {
    "PAYMCP_KEY_ID".to_string()
}

fn default_key_secret_env() -> String {
    "PAYMCP_KEY_SECRET".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
