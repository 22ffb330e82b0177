//! Client configuration
//!
//! `ClientConfig` can be assembled with the builder, deserialized from
//! YAML, or filled from `FRESHSALES_*` environment variables. Explicit
//! values always win over the environment.

use crate::error::{Error, Result, ResultExt};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "FRESHSALES_APIKEY";
/// Environment variable holding the account subdomain
pub const ENV_DOMAIN: &str = "FRESHSALES_DOMAIN";
/// Environment variable holding the proxy URL
pub const ENV_PROXY: &str = "FRESHSALES_PROXY";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent in the `Authorization: Token token=...` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Account subdomain, e.g. "acme" for acme.freshsales.io
    #[serde(default)]
    pub domain: Option<String>,

    /// Explicit base URL, takes precedence over `domain`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path prefix shared by every request
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Return response bodies undecoded
    #[serde(default)]
    pub raw_data: bool,

    /// Log request and response bodies (token redacted)
    #[serde(default)]
    pub debug: bool,

    /// Proxy URL for all requests
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Stop fetching pages once a cursor has buffered this many elements
    #[serde(default)]
    pub max_elements: Option<usize>,

    /// Keys used to read pagination metadata
    #[serde(default)]
    pub pagination: PaginationKeys,

    /// Keys used to read structured error bodies
    #[serde(default)]
    pub error_keys: ErrorKeys,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: None,
            base_url: None,
            api_root: default_api_root(),
            raw_data: false,
            debug: false,
            proxy: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            max_elements: None,
            pagination: PaginationKeys::default(),
            error_keys: ErrorKeys::default(),
        }
    }
}

fn default_api_root() -> String {
    "/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("freshsales-client/{}", env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Key Configuration
// ============================================================================

/// Where the page count lives in a paged response
///
/// With the defaults, `{"meta": {"total_pages": 3}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationKeys {
    #[serde(default = "default_meta_key")]
    pub meta: String,
    #[serde(default = "default_total_pages_key")]
    pub total_pages: String,
}

impl Default for PaginationKeys {
    fn default() -> Self {
        Self {
            meta: default_meta_key(),
            total_pages: default_total_pages_key(),
        }
    }
}

fn default_meta_key() -> String {
    "meta".to_string()
}

fn default_total_pages_key() -> String {
    "total_pages".to_string()
}

/// Field names of the code/message pair in error bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorKeys {
    #[serde(default = "default_code_key")]
    pub code: String,
    #[serde(default = "default_message_key")]
    pub message: String,
}

impl Default for ErrorKeys {
    fn default() -> Self {
        Self {
            code: default_code_key(),
            message: default_message_key(),
        }
    }
}

fn default_code_key() -> String {
    "code".to_string()
}

fn default_message_key() -> String {
    "message".to_string()
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Default config with credentials taken from the environment
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Fill unset credentials from `FRESHSALES_*` environment variables
    #[must_use]
    pub fn with_env(self) -> Self {
        self.fill_from(|key| std::env::var(key).ok())
    }

    /// Fill unset credentials from an arbitrary variable lookup
    #[must_use]
    pub fn fill_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.api_key.is_none() {
            self.api_key = lookup(ENV_API_KEY).none_if_empty();
        }
        if self.domain.is_none() {
            self.domain = lookup(ENV_DOMAIN).none_if_empty();
        }
        if self.proxy.is_none() {
            self.proxy = lookup(ENV_PROXY).none_if_empty();
        }
        self
    }

    /// Base URL requests are sent to
    pub fn resolved_base_url(&self) -> Result<Url> {
        let base = match (&self.base_url, &self.domain) {
            (Some(url), _) => url.clone(),
            (None, Some(domain)) => format!("https://{domain}.freshsales.io"),
            (None, None) => return Err(Error::missing_field("domain")),
        };
        Ok(Url::parse(&base)?)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the config is complete enough to issue requests
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(Error::missing_field("api_key"));
        }
        self.resolved_base_url()?;
        if let Some(proxy) = &self.proxy {
            Url::parse(proxy)?;
        }
        if !self.api_root.starts_with('/') {
            return Err(Error::InvalidConfigValue {
                field: "api_root".to_string(),
                message: format!("must start with '/', got '{}'", self.api_root),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the account subdomain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = Some(domain.into());
        self
    }

    /// Set an explicit base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the path prefix
    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.config.api_root = root.into();
        self
    }

    /// Enable or disable raw passthrough
    pub fn raw_data(mut self, raw: bool) -> Self {
        self.config.raw_data = raw;
        self
    }

    /// Enable or disable body logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Route traffic through a proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Cap the number of elements a cursor buffers
    pub fn max_elements(mut self, max: usize) -> Self {
        self.config.max_elements = Some(max);
        self
    }

    /// Override pagination metadata keys
    pub fn pagination_keys(mut self, meta: impl Into<String>, total_pages: impl Into<String>) -> Self {
        self.config.pagination = PaginationKeys {
            meta: meta.into(),
            total_pages: total_pages.into(),
        };
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
