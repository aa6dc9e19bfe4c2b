//! REST client for the lawn care backend.
//!
//! [`ResourceClient::request`] performs exactly one HTTP request and sorts the
//! outcome into success, [`ClientError::Http`] or [`ClientError::Network`].
//! There are no retries. The per-resource modules add typed wrappers for each
//! backend route.
//!
//! # Example
//!
//! ```rust,ignore
//! use glc_client::{ClientConfig, ResourceClient, Session};
//!
//! let client = ResourceClient::new(&config, &session)?;
//! let services = client.list_services().await?;
//! ```

mod customers;
mod providers;
mod reviews;
mod services;
mod subscriptions;

pub use customers::created_id;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::Session;

/// Maximum number of body characters copied into log lines.
const LOG_BODY_LIMIT: usize = 500;

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// `application/json` body.
    Json(Value),
    /// `text/plain` body.
    Text(String),
}

impl Payload {
    /// Encode a serializable value as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json(value: &impl Serialize) -> Result<Self, ClientError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Parsed because the response declared a JSON content type.
    Json(Value),
    /// Returned verbatim.
    Text(String),
}

impl ResponseBody {
    /// Decode into `T`.
    ///
    /// A text body is also tried as JSON, since some endpoints omit the
    /// content type.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DataShape`] naming `what` if the body does not
    /// have the expected shape.
    pub fn decode<T: DeserializeOwned>(self, what: &str) -> Result<T, ClientError> {
        let result = match self {
            Self::Json(value) => serde_json::from_value(value),
            Self::Text(text) => serde_json::from_str(&text),
        };
        result.map_err(|e| ClientError::DataShape(format!("Unexpected {what} response: {e}")))
    }

    /// The body as JSON, if it was parsed as such.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ResourceClient {
    inner: Arc<ResourceClientInner>,
}

struct ResourceClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<SecretString>,
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth_token", &self.inner.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ResourceClient {
    /// Create a client for `config`, authenticating as `session`.
    ///
    /// A token in the configuration takes precedence over a stored one.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: &Session) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(ClientError::Network)?;

        let auth_token = config
            .auth_token
            .clone()
            .or_else(|| session.auth_token().cloned());

        Ok(Self {
            inner: Arc::new(ResourceClientInner {
                client,
                base_url: config.api_base_url.clone(),
                auth_token,
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Perform one request.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] for any non-2xx status, with the body text
    /// - [`ClientError::Network`] when the request cannot complete
    /// - [`ClientError::DataShape`] when a JSON response does not parse
    #[instrument(skip(self, payload), fields(base = %self.inner.base_url))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<ResponseBody, ClientError> {
        let url = self.url(path)?;
        let mut builder = self.inner.client.request(method.clone(), url);

        if let Some(token) = &self.inner.auth_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(&value),
            Payload::Text(text) => builder.header(CONTENT_TYPE, "text/plain").body(text),
        };

        let response = builder.send().await.map_err(|e| {
            error!(%method, path, error = %e, "Request failed before a response arrived");
            ClientError::Network(e)
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = response.text().await.map_err(|e| {
            error!(%method, path, error = %e, "Failed to read response body");
            ClientError::Network(e)
        })?;

        if !status.is_success() {
            warn!(
                %method,
                path,
                status = status.as_u16(),
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(%method, path, status = status.as_u16(), "Request succeeded");

        if is_json && !text.trim().is_empty() {
            serde_json::from_str(&text).map(ResponseBody::Json).map_err(|e| {
                error!(
                    error = %e,
                    body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                    "Failed to parse JSON response"
                );
                ClientError::DataShape(format!("Response from {path} is not valid JSON: {e}"))
            })
        } else {
            Ok(ResponseBody::Text(text))
        }
    }

    /// `GET` a path and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, Payload::Empty)
            .await?
            .decode(what)
    }

    /// Send a JSON body and decode the JSON response.
    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<T, ClientError> {
        self.request(method, path, Payload::json(body)?)
            .await?
            .decode(what)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client(base: &str) -> ResourceClient {
        let config = ClientConfig::for_base_url(base).unwrap();
        ResourceClient::new(&config, &Session::anonymous()).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.url("/api/customers/3").unwrap().as_str(),
            "http://localhost:8080/api/customers/3"
        );

        let c = client("http://localhost:8080/glc/");
        assert_eq!(
            c.url("api/services").unwrap().as_str(),
            "http://localhost:8080/glc/api/services"
        );
    }

    #[test]
    fn test_decode_text_body_as_json() {
        let body = ResponseBody::Text("{\"id\": 4}".to_string());
        let value: Value = body.decode("service").unwrap();
        assert_eq!(value, json!({ "id": 4 }));
    }

    #[test]
    fn test_decode_wrong_shape() {
        #[derive(Debug, serde::Deserialize)]
        struct NeedsId {
            #[allow(dead_code)]
            id: i64,
        }
        let err = ResponseBody::Json(json!({ "name": "x" }))
            .decode::<NeedsId>("customer")
            .unwrap_err();
        assert!(matches!(err, ClientError::DataShape(ref m) if m.contains("customer")));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = ClientConfig::for_base_url("http://localhost:8080").unwrap();
        config.auth_token = Some(SecretString::from("top-secret"));
        let c = ResourceClient::new(&config, &Session::anonymous()).unwrap();
        let debug = format!("{c:?}");
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let c = client("http://127.0.0.1:9");
        let err = c
            .request(Method::GET, "/api/services", Payload::Empty)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
