//! Lazy element cursor over a paginated collection

use super::types::{extract_page, CursorState, PaginationMode, PAGE_PARAM};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestOptions};
use crate::types::{JsonValue, Method};
use futures::{Stream, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Forward-only sequence over every element of every page.
///
/// Pages are fetched only when consumption reaches past what is buffered.
/// Traversals can restart from any offset; they replay the shared buffer
/// and only fetch beyond its end.
#[derive(Debug)]
pub struct Cursor {
    client: Arc<HttpClient>,
    path: String,
    mode: PaginationMode,
    options: RequestOptions,
    max_elements: Option<usize>,
    state: CursorState,
}

impl Cursor {
    /// Create a cursor.
    ///
    /// A `page` entry in `options.params` is the page already consumed;
    /// the first fetch requests the one after it. It must be a
    /// non-negative integer.
    pub fn new(
        client: Arc<HttpClient>,
        path: impl Into<String>,
        mode: PaginationMode,
        options: RequestOptions,
    ) -> Result<Self> {
        let start_page = match options.params.get(PAGE_PARAM) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| Error::InvalidConfigValue {
                field: PAGE_PARAM.to_string(),
                message: format!("'{raw}' is not a page number: {e}"),
            })?,
            None => 0,
        };
        let max_elements = client.config().max_elements;

        Ok(Self {
            client,
            path: path.into(),
            mode,
            options,
            max_elements,
            state: CursorState::new(start_page),
        })
    }

    /// Override the buffer cap from the client config
    #[must_use]
    pub fn with_max_elements(mut self, max: Option<usize>) -> Self {
        self.max_elements = max;
        self
    }

    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Pagination mode
    pub fn mode(&self) -> &PaginationMode {
        &self.mode
    }

    /// Elements fetched so far
    pub fn buffered(&self) -> &[JsonValue] {
        &self.state.buffered
    }

    /// Number of the last page fetched
    pub fn next_page(&self) -> u32 {
        self.state.next_page
    }

    /// No further page will be fetched
    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted
            || self
                .max_elements
                .is_some_and(|max| self.state.buffered.len() >= max)
    }

    /// Element at `offset`, fetching pages until it is buffered.
    ///
    /// `Ok(None)` means the sequence ended before `offset`.
    pub async fn element_at(&mut self, offset: usize) -> Result<Option<JsonValue>> {
        loop {
            if let Some(element) = self.state.buffered.get(offset) {
                return Ok(Some(element.clone()));
            }
            if self.is_exhausted() {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    /// Traverse from the first element
    pub fn stream(&mut self) -> impl Stream<Item = Result<JsonValue>> + '_ {
        self.stream_from(0)
    }

    /// Traverse from `start`, replaying buffered elements first
    pub fn stream_from(&mut self, start: usize) -> impl Stream<Item = Result<JsonValue>> + '_ {
        futures::stream::try_unfold((self, start), |(cursor, offset)| async move {
            let element = cursor.element_at(offset).await?;
            Ok::<_, Error>(element.map(|value| (value, (cursor, offset + 1))))
        })
    }

    /// Drain every remaining page into one vector
    pub async fn collect_all(&mut self) -> Result<Vec<JsonValue>> {
        self.stream().try_collect().await
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let Some(page) = self.state.upcoming_page() else {
            warn!(path = %self.path, page = self.state.next_page, "No page number left to request");
            self.state.mark_exhausted();
            return Ok(());
        };
        let options = self.options.clone().param(PAGE_PARAM, page.to_string());

        let response = self.client.execute(Method::GET, &self.path, options).await?;
        let body = response
            .map(|r| r.body)
            .ok_or_else(|| Error::unexpected_shape("empty body"))?;

        let batch = extract_page(body, page, &self.mode, &self.client.config().pagination)?;
        debug!(
            path = %self.path,
            page,
            total_pages = ?batch.total_pages,
            collection = self.mode.collection().unwrap_or("<page>"),
            elements = batch.elements.len(),
            last = batch.last,
            "Fetched page"
        );

        self.state.append(page, batch);
        Ok(())
    }
}
