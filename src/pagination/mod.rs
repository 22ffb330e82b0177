//! Pagination module
//!
//! Supports: paged objects (`meta.total_pages`), unpaginated arrays
//!
//! # Overview
//!
//! A `Cursor` flattens successive pages of one endpoint into a single lazy
//! sequence. Pages are requested with `?page=N` as consumption advances, and
//! each body is interpreted by shape: objects report their page count in
//! metadata, arrays (search results) are complete on the first fetch.

mod cursor;
mod types;

pub use cursor::Cursor;
pub use types::{extract_page, CursorState, PageBatch, PaginationMode, PAGE_PARAM};

#[cfg(test)]
mod tests;
