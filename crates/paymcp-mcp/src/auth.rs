//! Per-request authentication.
//!
//! Every message is authenticated before it is routed. The result is a
//! [`RequestScope`] carrying the backend client the tool handlers use for
//! that one request; scopes are never shared between requests.
//!
//! Two modes are supported:
//!
//! - **Single tenant**: a default client is configured at startup and used
//!   for every request, whatever the transport says.
//! - **Multi tenant** (HTTP only): the `Authorization` header carries
//!   `Bearer base64(key_id:key_secret)` and a client is derived from it for
//!   the lifetime of the request.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use paymcp_client::{ClientError, ClientFactory, Credentials, PaymentsClient};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Authentication failures.
///
/// The display text ends up in the `data` member of the JSON-RPC error; the
/// message itself is always "Authentication failed".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header required")]
    MissingHeader,

    #[error("authorization header must use the Bearer scheme")]
    InvalidScheme,

    #[error("invalid token encoding")]
    InvalidEncoding,

    #[error("invalid token format: expected base64(key_id:key_secret)")]
    InvalidFormat,

    #[error("no client found in context")]
    NoClient,

    #[error("failed to create client: {0}")]
    Client(#[from] ClientError),
}

/// What the transport knows about the caller.
#[derive(Clone, Default)]
pub enum TransportCredentials {
    /// No transport-level credentials (stdio).
    #[default]
    None,
    /// The raw `Authorization` header of an HTTP request, if any.
    AuthorizationHeader(Option<String>),
}

impl std::fmt::Debug for TransportCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportCredentials::None => write!(f, "None"),
            TransportCredentials::AuthorizationHeader(None) => write!(f, "AuthorizationHeader(None)"),
            TransportCredentials::AuthorizationHeader(Some(_)) => {
                write!(f, "AuthorizationHeader(<redacted>)")
            }
        }
    }
}

/// Per-request context handed to tool handlers.
#[derive(Clone)]
pub struct RequestScope {
    client: Arc<dyn PaymentsClient>,
    request_id: String,
}

impl RequestScope {
    pub fn new(client: Arc<dyn PaymentsClient>) -> Self {
        Self {
            client,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Backend client bound to this request.
    pub fn client(&self) -> &dyn PaymentsClient {
        self.client.as_ref()
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("request_id", &self.request_id)
            .field("key_id", &self.client.key_id())
            .finish()
    }
}

/// Decode `Bearer base64(key_id:key_secret)`.
pub fn parse_bearer(header: &str) -> Result<Credentials, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    let decoded = STANDARD
        .decode(token.trim())
        .map_err(|_| AuthError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

    match decoded.split_once(':') {
        Some((key_id, key_secret)) if !key_id.is_empty() && !key_secret.is_empty() => {
            Ok(Credentials::new(key_id, key_secret))
        }
        _ => Err(AuthError::InvalidFormat),
    }
}

/// Resolves the backend client for each incoming request.
#[derive(Clone, Default)]
pub struct Authenticator {
    default_client: Option<Arc<dyn PaymentsClient>>,
    factory: Option<Arc<dyn ClientFactory>>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `client` for every request.
    pub fn with_default_client(mut self, client: Arc<dyn PaymentsClient>) -> Self {
        self.default_client = Some(client);
        self
    }

    /// Derive clients from bearer credentials when no default client is set.
    pub fn with_client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn has_default_client(&self) -> bool {
        self.default_client.is_some()
    }

    pub fn authenticate(&self, credentials: &TransportCredentials) -> Result<RequestScope, AuthError> {
        if let Some(client) = &self.default_client {
            return Ok(RequestScope::new(Arc::clone(client)));
        }

        match credentials {
            TransportCredentials::None => Err(AuthError::NoClient),
            TransportCredentials::AuthorizationHeader(None) => Err(AuthError::MissingHeader),
            TransportCredentials::AuthorizationHeader(Some(header)) => {
                let creds = parse_bearer(header)?;
                let factory = self.factory.as_ref().ok_or(AuthError::NoClient)?;
                let client = factory.client_for(creds)?;
                Ok(RequestScope::new(client))
            }
        }
    }
}
