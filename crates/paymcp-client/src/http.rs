//! reqwest-backed implementation of [`PaymentsClient`].

use crate::{ClientError, ClientFactory, Credentials, PaymentsClient};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("paymcp/", env!("CARGO_PKG_VERSION"));

/// Payments API client authenticating with HTTP basic auth.
#[derive(Clone)]
pub struct HttpPaymentsClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpPaymentsClient {
    /// Create a client with its own connection pool.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self::with_http(build_http(timeout)?, base_url, credentials))
    }

    /// Create a client on top of an existing reqwest client.
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ClientError> {
        let response = builder
            .basic_auth(&self.credentials.key_id, Some(&self.credentials.key_secret))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Payments API returned an error");
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PaymentsClient for HttpPaymentsClient {
    fn key_id(&self) -> &str {
        &self.credentials.key_id
    }

    async fn get(&self, path: &str, query: &Map<String, Value>) -> Result<Value, ClientError> {
        tracing::debug!(path, "GET");
        let builder = self.http.get(self.url(path)).query(&query_pairs(query));
        self.send(builder).await
    }

    async fn post(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ClientError> {
        tracing::debug!(path, "POST");
        let builder = self.http.post(self.url(path)).json(body);
        self.send(builder).await
    }

    async fn patch(&self, path: &str, body: &Map<String, Value>) -> Result<Value, ClientError> {
        tracing::debug!(path, "PATCH");
        let builder = self.http.patch(self.url(path)).json(body);
        self.send(builder).await
    }
}

/// Derives per-request clients that share one connection pool.
#[derive(Clone)]
pub struct HttpClientFactory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClientFactory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http(timeout)?,
            base_url: base_url.into(),
        })
    }
}

impl ClientFactory for HttpClientFactory {
    fn client_for(&self, credentials: Credentials) -> Result<Arc<dyn PaymentsClient>, ClientError> {
        Ok(Arc::new(HttpPaymentsClient::with_http(
            self.http.clone(),
            self.base_url.clone(),
            credentials,
        )))
    }
}

fn build_http(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ClientError::Config(e.to_string()))
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Flatten a JSON query map into URL parameters.
///
/// Arrays repeat the key once per element (`expand[]=card&expand[]=emi`);
/// nulls are dropped.
fn query_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(query.len());
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_to_string(other) {
                    pairs.push((key.clone(), s));
                }
            }
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
