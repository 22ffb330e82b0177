//! CLI commands and argument parsing

use crate::types::Method;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Freshsales API command-line client
#[derive(Parser, Debug)]
#[command(name = "freshsales")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Account subdomain [fallback: FRESHSALES_DOMAIN]
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// API key [fallback: FRESHSALES_APIKEY]
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Base URL, overrides the domain
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print response bodies undecoded
    #[arg(long, global = true)]
    pub raw: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output (logs requests and bodies)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Perform a single request
    Request {
        /// HTTP verb (get, put, post, delete)
        verb: Method,

        /// Path segments, e.g. `leads 100 convert`
        segments: Vec<String>,

        /// Query parameter (key=value), repeatable
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Request header (key=value), repeatable
        #[arg(short = 'H', long = "header", value_parser = parse_key_val)]
        headers: Vec<(String, String)>,

        /// Request body, sent verbatim
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Stream every element of a paginated collection
    All {
        /// Path segments, e.g. `leads view 1`
        #[arg(required = true)]
        segments: Vec<String>,

        /// Emit whole page bodies instead of collection items
        #[arg(long, conflicts_with = "collection")]
        pages: bool,

        /// Collection key to extract (defaults to the first segment)
        #[arg(long)]
        collection: Option<String>,

        /// Query parameter (key=value), repeatable
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Stop after this many elements
        #[arg(long)]
        limit: Option<usize>,

        /// Stop fetching pages once this many elements are buffered
        #[arg(long)]
        max_elements: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `key=value` pair
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}
