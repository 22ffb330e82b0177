//! # Freshsales Client
//!
//! A dynamic REST client for the Freshsales API. Request paths are built
//! by chaining segments, a verb performs the request, and paginated
//! collections are flattened into one lazy sequence.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use freshsales_client::{chain, Api, ClientConfig, RequestOptions, Result};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = Api::new(
//!         ClientConfig::builder()
//!             .domain("acme")
//!             .api_key("...")
//!             .build(),
//!     )?;
//!
//!     // GET /api/leads/100
//!     let lead = chain!(api => leads(100)).get(RequestOptions::new()).await?;
//!
//!     // Every lead of view 1, across all pages
//!     let mut cursor = chain!(api => leads.view(1)).get_all(RequestOptions::new())?;
//!     let leads: Vec<_> = cursor.stream().try_collect().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  Api ──request()──▶ RequestBuilder ──get/put/post/delete──▶ HttpClient
//!                          │                                      ▲
//!                   get_all/get_all_pages                         │
//!                          ▼                                      │
//!                        Cursor ──────────── page N ──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Authentication
pub mod auth;

/// HTTP dispatch
pub mod http;

/// Lazy pagination cursor
pub mod pagination;

/// Path-building request chains
pub mod request;

/// Client entry point
pub mod api;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::Api;
pub use config::ClientConfig;
pub use error::{ApiError, Error, Result};
pub use http::{Body, RequestOptions, Response, ResponseBody};
pub use pagination::{Cursor, PaginationMode};
pub use request::RequestBuilder;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
