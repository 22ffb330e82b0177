//! HTTP dispatch module
//!
//! Provides the single verb-agnostic entry point every request goes
//! through, plus the request and response types around it.
//!
//! # Features
//!
//! - **Header Merging**: Content type and auth defaults, caller overrides
//! - **Body Encoding**: JSON values are serialized, raw strings pass through
//! - **Response Decoding**: JSON decoding or raw passthrough
//! - **Error Translation**: Status, raw body and code/message in one error

mod client;
mod response;

pub use client::{Body, HttpClient, RequestOptions};
pub use response::{Response, ResponseBody};
