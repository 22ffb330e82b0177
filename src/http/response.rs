//! Response types

use crate::types::{JsonValue, StringMap};

/// Decoded body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Decoded JSON document
    Json(JsonValue),
    /// Undecoded bytes, produced in raw passthrough mode
    Raw(Vec<u8>),
}

impl ResponseBody {
    /// JSON value, if decoded
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Raw bytes, if undecoded
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Self::Json(_) => None,
            Self::Raw(bytes) => Some(bytes.as_slice()),
        }
    }

    /// Short name of the body's shape, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw",
            Self::Json(JsonValue::Object(_)) => "object",
            Self::Json(JsonValue::Array(_)) => "array",
            Self::Json(JsonValue::String(_)) => "string",
            Self::Json(JsonValue::Number(_)) => "number",
            Self::Json(JsonValue::Bool(_)) => "boolean",
            Self::Json(JsonValue::Null) => "null",
        }
    }
}

/// Response to a single request
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lower-cased
    pub headers: StringMap,
    /// Response body
    pub body: ResponseBody,
}

impl Response {
    /// Look up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// JSON body, if decoded
    pub fn json(&self) -> Option<&JsonValue> {
        self.body.as_json()
    }
}
