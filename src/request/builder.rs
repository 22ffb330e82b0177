//! Path-accumulating request builder

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestOptions, Response};
use crate::pagination::{Cursor, PaginationMode};
use crate::types::Method;
use std::fmt::Display;
use std::sync::Arc;

/// Accumulates path segments until a terminal call.
///
/// Terminal calls take the builder by value, so a builder issues at most
/// one request or cursor.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: Arc<HttpClient>,
    segments: Vec<String>,
}

impl RequestBuilder {
    /// Create an empty builder on a shared dispatcher
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            segments: Vec::new(),
        }
    }

    /// Append a named segment
    #[must_use]
    pub fn segment(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    /// Append an argument segment, e.g. a record id
    #[must_use]
    pub fn arg(mut self, value: impl Display) -> Self {
        self.segments.push(value.to_string());
        self
    }

    /// Append a named segment followed by its arguments
    #[must_use]
    pub fn segment_with<I>(self, name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        args.into_iter().fold(self.segment(name), Self::arg)
    }

    /// Segments accumulated so far
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Absolute request path under the configured API root
    pub fn path(&self) -> String {
        let root = self.client.config().api_root.trim_end_matches('/');
        format!("{root}/{}", self.segments.join("/"))
    }

    /// Name of the collection this chain addresses (its first segment)
    pub fn collection_name(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Dispatch with any verb
    pub async fn execute(self, method: Method, options: RequestOptions) -> Result<Option<Response>> {
        let path = self.path();
        self.client.execute(method, &path, options).await
    }

    /// GET the accumulated path
    pub async fn get(self, options: RequestOptions) -> Result<Option<Response>> {
        self.execute(Method::GET, options).await
    }

    /// PUT to the accumulated path
    pub async fn put(self, options: RequestOptions) -> Result<Option<Response>> {
        self.execute(Method::PUT, options).await
    }

    /// POST to the accumulated path
    pub async fn post(self, options: RequestOptions) -> Result<Option<Response>> {
        self.execute(Method::POST, options).await
    }

    /// DELETE the accumulated path
    pub async fn delete(self, options: RequestOptions) -> Result<Option<Response>> {
        self.execute(Method::DELETE, options).await
    }

    /// Cursor yielding each page body as one element
    pub fn get_all_pages(self, options: RequestOptions) -> Result<Cursor> {
        self.cursor(PaginationMode::WholePage, options)
    }

    /// Cursor over the items of the collection named by the first segment
    pub fn get_all(self, options: RequestOptions) -> Result<Cursor> {
        let collection = self
            .collection_name()
            .ok_or(Error::MissingCollection)?
            .to_string();
        self.get_all_in(collection, options)
    }

    /// Cursor over the items stored under an explicit collection key
    pub fn get_all_in(self, collection: impl Into<String>, options: RequestOptions) -> Result<Cursor> {
        self.cursor(PaginationMode::ExtractCollection(collection.into()), options)
    }

    /// Cursor with an explicit mode
    pub fn cursor(self, mode: PaginationMode, options: RequestOptions) -> Result<Cursor> {
        let path = self.path();
        Cursor::new(self.client, path, mode, options)
    }
}
