//! CLI module
//!
//! Command-line interface for issuing requests.
//!
//! # Commands
//!
//! - `request` - Perform a single request against a segment path
//! - `all` - Stream every element of a paginated collection

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
