//! Authenticator implementation
//!
//! Applies credentials to requests and redacts them from log output.

use super::types::AuthConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Token token=)(\w+)").expect("token pattern is valid"));

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Headers this authenticator adds to every request
    pub fn headers(&self) -> Vec<(String, String)> {
        match &self.config {
            AuthConfig::None => Vec::new(),
            AuthConfig::Token { api_key } => vec![(
                "Authorization".to_string(),
                format!("Token token={api_key}"),
            )],
        }
    }

    /// Whether any credentials are configured
    pub fn is_configured(&self) -> bool {
        !matches!(self.config, AuthConfig::None)
    }
}

/// Mask `Token token=<secret>` occurrences
pub fn redact(text: &str) -> Cow<'_, str> {
    TOKEN_PATTERN.replace_all(text, "${1}[HIDDEN]")
}
