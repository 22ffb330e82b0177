//! Auth configuration types

use crate::config::ClientConfig;

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Freshsales API key, sent as `Authorization: Token token=<key>`
    Token {
        /// The API key value
        api_key: String,
    },
}

impl AuthConfig {
    /// Auth derived from the client config
    pub fn from_config(config: &ClientConfig) -> Self {
        match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => Self::Token {
                api_key: key.to_string(),
            },
            _ => Self::None,
        }
    }
}
