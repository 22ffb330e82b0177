//! Pagination types
//!
//! Defines the cursor's mode, its private state, and the pure step that
//! turns one fetched page body into a batch of elements.

use crate::config::PaginationKeys;
use crate::error::{Error, Result};
use crate::http::ResponseBody;
use crate::types::JsonValue;
use tracing::warn;

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// What a cursor yields for each fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationMode {
    /// Each page body is one element
    WholePage,
    /// Elements are the items of the array stored under this key
    ExtractCollection(String),
}

impl PaginationMode {
    /// Collection key, if extracting
    pub fn collection(&self) -> Option<&str> {
        match self {
            Self::WholePage => None,
            Self::ExtractCollection(name) => Some(name),
        }
    }
}

/// Elements extracted from one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch {
    /// Elements in page order
    pub elements: Vec<JsonValue>,
    /// No page follows this one
    pub last: bool,
    /// Page count reported by the server, if any
    pub total_pages: Option<u64>,
}

/// Mutable state owned by a single cursor
///
/// `buffered` only grows, `exhausted` only goes from false to true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorState {
    /// Every element fetched so far
    pub buffered: Vec<JsonValue>,
    /// Number of the last page fetched (0 before the first fetch)
    pub next_page: u32,
    /// No further page will be fetched
    pub exhausted: bool,
}

impl CursorState {
    /// State for a cursor whose first fetch requests `start_page + 1`
    pub fn new(start_page: u32) -> Self {
        Self {
            next_page: start_page,
            ..Default::default()
        }
    }

    /// Page number the next fetch requests, `None` past the last
    /// representable page
    pub fn upcoming_page(&self) -> Option<u32> {
        self.next_page.checked_add(1)
    }

    /// Record a fetched page
    pub fn append(&mut self, page: u32, batch: PageBatch) {
        self.buffered.extend(batch.elements);
        self.exhausted |= batch.last;
        self.next_page = page;
    }

    /// Mark the cursor done without fetching
    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }
}

/// Interpret one page body.
///
/// Objects carry `meta.total_pages` (key names from `keys`); arrays are a
/// complete, unpaginated result set.
pub fn extract_page(
    body: ResponseBody,
    page: u32,
    mode: &PaginationMode,
    keys: &PaginationKeys,
) -> Result<PageBatch> {
    match body {
        ResponseBody::Json(JsonValue::Object(mut map)) => {
            let total_pages = map
                .get(&keys.meta)
                .and_then(|meta| meta.get(&keys.total_pages))
                .and_then(page_count);

            let last = match total_pages {
                Some(total) => u64::from(page) >= total,
                None => {
                    warn!(
                        page,
                        meta_key = %keys.meta,
                        "Page carries no page count, treating it as the last page"
                    );
                    true
                }
            };

            let elements = match mode {
                PaginationMode::WholePage => vec![JsonValue::Object(map)],
                PaginationMode::ExtractCollection(name) => match map.remove(name) {
                    Some(JsonValue::Array(items)) => items,
                    Some(other) => {
                        return Err(Error::extraction(
                            name.as_str(),
                            format!("expected an array, found {}", ResponseBody::Json(other).kind()),
                        ))
                    }
                    None => return Err(Error::extraction(name.as_str(), "key not present in page")),
                },
            };

            Ok(PageBatch {
                elements,
                last,
                total_pages,
            })
        }
        ResponseBody::Json(JsonValue::Array(items)) => Ok(PageBatch {
            elements: items,
            last: true,
            total_pages: None,
        }),
        ResponseBody::Raw(_) => Err(Error::RawPagination),
        other => Err(Error::unexpected_shape(other.kind())),
    }
}

fn page_count(value: &JsonValue) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
