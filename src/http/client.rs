//! Request dispatcher
//!
//! Turns a verb, a path and per-request options into one HTTP round trip:
//! - Default headers (content type, auth) merged with caller overrides
//! - Query parameters and body serialization
//! - Response body decoding, or raw passthrough
//! - Translation of every transport failure into `ApiError`

use super::response::{Response, ResponseBody};
use crate::auth::{redact, AuthConfig, Authenticator};
use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result};
use crate::types::{JsonValue, Method, StringMap};
use once_cell::sync::OnceCell;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::fmt;
use tracing::debug;
use url::Url;

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized with serde_json before sending
    Json(JsonValue),
    /// Sent as-is
    Raw(String),
}

impl Body {
    /// Wire representation of the body
    pub fn encode(&self) -> Result<String> {
        match self {
            Body::Json(value) => Ok(serde_json::to_string(value)?),
            Body::Raw(text) => Ok(text.clone()),
        }
    }
}

impl From<JsonValue> for Body {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

/// Options for a single request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query parameters
    pub params: StringMap,
    /// Request headers, override defaults on collision
    pub headers: StringMap,
    /// Request body
    pub body: Option<Body>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Set a pre-serialized body
    #[must_use]
    pub fn raw(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }
}

/// HTTP dispatcher shared by every request builder and cursor of one client
pub struct HttpClient {
    config: ClientConfig,
    base_url: Url,
    authenticator: Authenticator,
    connection: OnceCell<Client>,
}

impl HttpClient {
    /// Create a dispatcher; the connection is built on first use
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.resolved_base_url()?;
        let authenticator = Authenticator::new(AuthConfig::from_config(&config));
        Ok(Self {
            config,
            base_url,
            authenticator,
            connection: OnceCell::new(),
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether the underlying connection has been built yet
    pub fn is_connected(&self) -> bool {
        self.connection.get().is_some()
    }

    fn connection(&self) -> Result<&Client> {
        self.connection.get_or_try_init(|| {
            let mut builder = Client::builder()
                .timeout(self.config.timeout())
                .user_agent(&self.config.user_agent)
                .min_tls_version(reqwest::tls::Version::TLS_1_2);
            if let Some(proxy) = &self.config.proxy {
                builder = builder.proxy(reqwest::Proxy::all(proxy)?);
            }
            debug!(base_url = %self.base_url, "Building HTTP connection");
            Ok(builder.build()?)
        })
    }

    /// Full URL for an absolute API path
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Perform one request.
    ///
    /// Returns `Ok(None)` when the server answers with an empty body.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Response>> {
        let url = self.url(path)?;
        let client = self.connection()?;
        let mut req = client.request(method.into(), url.clone());

        for (key, value) in self.merged_headers(&options.headers) {
            req = req.header(key, value);
        }

        if !options.params.is_empty() {
            req = req.query(&options.params);
        }

        let body = options.body.as_ref().map(Body::encode).transpose()?;

        debug!(%method, %url, params = ?options.params, "Sending request");
        if self.config.debug {
            let headers = format!("{:?}", self.merged_headers(&options.headers));
            debug!(headers = %redact(&headers), body = body.as_deref().unwrap_or(""), "Request detail");
        }

        if let Some(body) = body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(transport_error)?;
        let status = response.status();
        let headers = header_map(response.headers());
        let failure = response.error_for_status_ref().err().map(|e| e.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError {
                status: Some(status.as_u16()),
                ..ApiError::transport(e.to_string())
            })?
            .to_vec();

        debug!(%method, %url, status = status.as_u16(), bytes = bytes.len(), "Received response");
        if self.config.debug {
            debug!(body = %String::from_utf8_lossy(&bytes), "Response detail");
        }

        if let Some(fallback) = failure {
            let keys = &self.config.error_keys;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let err = ApiError::from_response(status.as_u16(), text, fallback, &keys.code, &keys.message);
            return Err(err.into());
        }

        self.parse_response(status, headers, bytes)
    }

    /// Decode a successful response body
    ///
    /// Raw passthrough keeps the bytes as received.
    fn parse_response(
        &self,
        status: StatusCode,
        headers: StringMap,
        bytes: Vec<u8>,
    ) -> Result<Option<Response>> {
        if bytes.is_empty() {
            return Ok(None);
        }

        let body = if self.config.raw_data {
            ResponseBody::Raw(bytes)
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    return Err(Error::unparseable(
                        String::from_utf8_lossy(&bytes),
                        e.to_string(),
                    ))
                }
            }
        };

        Ok(Some(Response {
            status: status.as_u16(),
            headers,
            body,
        }))
    }

    /// Defaults first, then caller headers replacing same-named entries
    fn merged_headers(&self, overrides: &StringMap) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        headers.extend(self.authenticator.headers());

        for (key, value) in overrides {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
                Some(slot) => slot.1.clone_from(value),
                None => headers.push((key.clone(), value.clone())),
            }
        }
        headers
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_root", &self.config.api_root)
            .field("raw_data", &self.config.raw_data)
            .field("has_authenticator", &self.authenticator.is_configured())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    ApiError {
        status: err.status().map(|s| s.as_u16()),
        ..ApiError::transport(err.to_string())
    }
    .into()
}

fn header_map(headers: &HeaderMap) -> StringMap {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
