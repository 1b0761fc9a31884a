//! # paymcp-client
//!
//! The backend collaborator for paymcp tool handlers.
//!
//! Tool handlers never talk HTTP themselves; they receive a
//! [`PaymentsClient`] through their request scope and call `get`/`post`/`patch`
//! with an API path and a JSON payload. In single-tenant mode one client is
//! built at startup; in multi-tenant mode a [`ClientFactory`] derives a client
//! per request from the caller's credentials.

pub mod error;
pub mod http;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use error::ClientError;
pub use http::{HttpClientFactory, HttpPaymentsClient};

/// API key id / secret pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key_id: String,
    pub key_secret: String,
}

impl Credentials {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

/// Operations the tool handlers need from the payments API.
///
/// `path` is relative to the configured base URL, e.g. `/payments/pay_123`.
#[async_trait]
pub trait PaymentsClient: Send + Sync {
    /// Key id the client authenticates with. Used for logging only.
    fn key_id(&self) -> &str;

    /// GET `path` with `query` encoded as URL parameters.
    async fn get(&self, path: &str, query: &Map<String, Value>) -> Result<Value, ClientError>;

    /// POST `body` as JSON to `path`.
    async fn post(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ClientError>;

    /// PATCH `body` as JSON to `path`.
    async fn patch(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ClientError>;
}

/// Builds clients from per-request credentials.
pub trait ClientFactory: Send + Sync {
    fn client_for(&self, credentials: Credentials) -> Result<Arc<dyn PaymentsClient>, ClientError>;
}
