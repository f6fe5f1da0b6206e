//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Timeout;

/// Timeout as sent by clients: seconds, or one of the keywords
/// `"none"` (persistent) and `"default"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimeoutField {
    Seconds(i64),
    Keyword(String),
}

impl TimeoutField {
    /// Converts the wire form into a cache timeout.
    pub fn to_timeout(&self) -> Result<Timeout, String> {
        match self {
            TimeoutField::Seconds(seconds) => Ok(Timeout::Seconds(*seconds)),
            TimeoutField::Keyword(word) => match word.to_ascii_lowercase().as_str() {
                "none" | "never" => Ok(Timeout::Never),
                "default" => Ok(Timeout::Default),
                _ => Err(format!(
                    "Unknown timeout '{}': expected seconds, \"none\" or \"default\"",
                    word
                )),
            },
        }
    }
}

/// Request body for the SET (PUT /set) and ADD (POST /add) operations
///
/// # Fields
/// - `key`: The logical cache key, optionally starting with `N-days:`
/// - `value`: Any JSON value
/// - `timeout`: Optional timeout (uses the server default if not specified)
/// - `version`: Optional key version
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional timeout
    #[serde(default)]
    pub timeout: Option<TimeoutField>,
    /// Optional version
    #[serde(default)]
    pub version: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if let Some(Err(msg)) = self.timeout.as_ref().map(TimeoutField::to_timeout) {
            return Some(msg);
        }
        None
    }

    /// Requested timeout, `Timeout::Default` when absent or invalid.
    pub fn timeout(&self) -> Timeout {
        self.timeout
            .as_ref()
            .and_then(|field| field.to_timeout().ok())
            .unwrap_or_default()
    }
}

/// Query string accepted by the key-addressed endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionQuery {
    #[serde(default)]
    pub version: Option<u64>,
}
