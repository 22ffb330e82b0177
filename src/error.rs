//! Error types for the Freshsales client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Status reported for successful responses whose body could not be decoded
pub const UNPARSEABLE_STATUS: u16 = 500;

/// The main error type for the Freshsales client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(ApiError),

    #[error("Unparseable response: '{raw_body}'")]
    UnparseableResponse {
        raw_body: String,
        detail: String,
        status_code: u16,
    },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Unexpected data type received: {kind}")]
    UnexpectedShape { kind: String },

    #[error("Unexpected data type received: raw body. Pagination is unsupported with raw_data")]
    RawPagination,

    #[error("Failed to extract records from '{collection}': {message}")]
    RecordExtraction { collection: String, message: String },

    #[error("Cannot paginate without a collection name (no path segments)")]
    MissingCollection,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an unparseable response error
    pub fn unparseable(raw_body: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnparseableResponse {
            raw_body: raw_body.into(),
            detail: detail.into(),
            status_code: UNPARSEABLE_STATUS,
        }
    }

    /// Create an unexpected response shape error
    pub fn unexpected_shape(kind: impl Into<String>) -> Self {
        Self::UnexpectedShape { kind: kind.into() }
    }

    /// Create a record extraction error
    pub fn extraction(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status,
            Error::UnparseableResponse { status_code, .. } => Some(*status_code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Uniform error for transport and HTTP status failures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiError {
    /// HTTP status code, absent for network-level failures
    pub status: Option<u16>,
    /// Raw response body as received
    pub raw_body: Option<String>,
    /// Best-effort structured decoding of the body
    pub body: Option<Value>,
    /// Error code from the body's code field
    pub code: Option<Value>,
    /// Human readable message
    pub message: String,
}

impl ApiError {
    /// Build from a transport failure, status unset
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Build from an error response.
    ///
    /// `fallback` is used as the message unless the body decodes to an
    /// object carrying a string under `message_key`.
    pub fn from_response(
        status: u16,
        raw_body: String,
        fallback: impl Into<String>,
        code_key: &str,
        message_key: &str,
    ) -> Self {
        let body = serde_json::from_str::<Value>(&raw_body).ok();
        let code = body
            .as_ref()
            .and_then(|b| b.get(code_key))
            .filter(|c| !c.is_null())
            .cloned();
        let detail = body
            .as_ref()
            .and_then(|b| b.get(message_key))
            .and_then(|m| match m {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            });

        Self {
            status: Some(status),
            raw_body: (!raw_body.is_empty()).then_some(raw_body),
            body,
            code,
            message: detail.unwrap_or_else(|| fallback.into()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if let Some(code) = &self.code {
            write!(f, " [code {code}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Result type alias for the Freshsales client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
