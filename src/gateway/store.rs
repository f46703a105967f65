//! Remote state store interface

use serde_json::Value;

use crate::config::Credential;
use crate::error::{GlancerError, Result};

/// An authenticated JSON store holding viewer states.
///
/// Publishing always creates a new object. There is no compare-and-swap:
/// when two callers publish concurrently both objects exist and whichever
/// link is shared last is the one users see.
pub trait StateStore: Send + Sync {
    /// Read the payload stored at `json_url`.
    fn fetch(&self, json_url: &str, credential: &Credential) -> Result<Value>;

    /// Store `payload` through `publish_url` and return the pointer to it.
    fn publish(&self, publish_url: &str, payload: &Value, credential: &Credential)
        -> Result<String>;
}

/// Interpret a publish response body as a pointer.
pub fn pointer_from_body(body: &Value) -> Result<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(GlancerError::InvalidPointer {
            body: other.to_string(),
        }),
    }
}
