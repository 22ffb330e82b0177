//! Authentication module
//!
//! Supports: Freshsales token
//!
//! The `Authenticator` applies credentials to outgoing requests and
//! masks them in anything that gets logged.

mod authenticator;
mod types;

pub use authenticator::{redact, Authenticator};
pub use types::AuthConfig;
