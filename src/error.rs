//! Error types for the cache backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache backend and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A non-persistent write targeted a key without a `N-days` directive
    #[error("Key '{key}' has no time-bucket directive (expected 'N-days:...')")]
    MalformedKey { key: String },

    /// Requested timeout outlives the key's declared bucket
    #[error(
        "Timeout of {requested_days} day(s) exceeds the {max_days} day lifetime declared by key '{key}'"
    )]
    TimeoutExceedsKeyLifetime {
        key: String,
        requested_days: u64,
        max_days: u64,
    },

    /// Key cannot address an object
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value could not be encoded by the serializer
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Any object store failure other than a handled not-found
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),

    /// Bad store URL or settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Key missing or expired (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data (HTTP surface only)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns true if the error rejects the key/timeout combination of a write.
    pub fn is_key_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::MalformedKey { .. } | Self::TimeoutExceedsKeyLifetime { .. }
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::MalformedKey { .. }
            | CacheError::TimeoutExceedsKeyLifetime { .. }
            | CacheError::InvalidKey(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Store(_) => StatusCode::BAD_GATEWAY,
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache backend.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
