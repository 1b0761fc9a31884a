//! Error types for the payments client.

use thiserror::Error;

/// Errors returned by backend calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with an error body.
    #[error("{description}")]
    Api {
        status: u16,
        code: String,
        description: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 2xx with something that is not JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The client could not be constructed.
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an API error from a non-success status and the raw body.
    ///
    /// Bodies of the form `{"error": {"code": ..., "description": ...}}` are
    /// unpacked; anything else is reported with the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct Envelope {
            error: Detail,
        }

        #[derive(serde::Deserialize)]
        struct Detail {
            #[serde(default)]
            code: String,
            #[serde(default)]
            description: String,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(Envelope { error }) if !error.description.is_empty() => ClientError::Api {
                status,
                code: error.code,
                description: error.description,
            },
            Ok(Envelope { error }) => ClientError::Api {
                status,
                code: error.code,
                description: format!("API returned HTTP {status}"),
            },
            Err(_) => ClientError::Api {
                status,
                code: String::new(),
                description: format!("API returned HTTP {status}"),
            },
        }
    }
}
