//! Request building module
//!
//! A `RequestBuilder` accumulates path segments from an open-ended chain
//! and is consumed by a terminal call: one of the four verbs, or a
//! pagination entry point returning a `Cursor`.
//!
//! ```rust,ignore
//! use freshsales_client::{chain, Api, RequestOptions};
//!
//! let api = Api::from_env()?;
//! // GET /api/leads/100/convert
//! let converted = chain!(api => leads(100).convert)
//!     .get(RequestOptions::new())
//!     .await?;
//! ```

mod builder;

pub use builder::RequestBuilder;

/// Build a request path with method-call syntax.
///
/// Each identifier becomes a segment and each call argument becomes a
/// further segment, so `chain!(api => leads(100).convert)` is
/// `api.request().segment("leads").arg(100).segment("convert")`.
#[macro_export]
macro_rules! chain {
    ($api:expr => $($segment:ident $(( $($arg:expr),* $(,)? ))?).+) => {
        $api.request()
            $( .segment(stringify!($segment)) $($( .arg($arg) )*)? )+
    };
}
