//! Client entry point
//!
//! `Api` owns the shared dispatcher and hands out a fresh
//! `RequestBuilder` for every chain.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::request::RequestBuilder;
use std::sync::Arc;

/// Entry point for building requests against one account
#[derive(Debug, Clone)]
pub struct Api {
    client: Arc<HttpClient>,
}

impl Api {
    /// Create a client from a validated config
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_client(HttpClient::new(config)?))
    }

    /// Create a client configured from `FRESHSALES_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Wrap an existing dispatcher
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Shared dispatcher
    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    /// Start an empty chain
    pub fn request(&self) -> RequestBuilder {
        RequestBuilder::new(Arc::clone(&self.client))
    }

    /// Start a chain with its first segment
    pub fn segment(&self, name: impl Into<String>) -> RequestBuilder {
        self.request().segment(name)
    }

    /// Start a chain from a list of segments
    pub fn path<I>(&self, segments: I) -> RequestBuilder
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        segments
            .into_iter()
            .fold(self.request(), RequestBuilder::segment)
    }
}
