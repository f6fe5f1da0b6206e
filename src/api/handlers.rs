//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheBackend, CacheOptions, JsonSerializer, ObjectStoreCache};
use crate::config::Config;
use crate::error::{CacheError, CacheResult};
use crate::models::{
    AddResponse, DeleteResponse, GetResponse, HasKeyResponse, HealthResponse, SetRequest,
    SetResponse, VersionQuery,
};
use crate::store::{open_store, StoreSpec};

/// Cache served over HTTP: JSON values in an object store.
pub type JsonCache = ObjectStoreCache<JsonSerializer<Value>>;

/// Application state shared across all handlers.
///
/// The cache holds only immutable configuration, so a plain `Arc` is enough.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<JsonCache>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: JsonCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates an AppState over a fresh in-memory store.
    pub fn in_memory(options: CacheOptions) -> Self {
        let store = Arc::new(object_store::memory::InMemory::new());
        Self::new(ObjectStoreCache::new(store, options, JsonSerializer::new()))
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the configured object store and wraps it in a cache.
    pub fn from_config(config: &Config) -> CacheResult<Self> {
        let spec = StoreSpec::parse(&config.store_url)?;
        let store = open_store(&spec)?;
        Ok(Self::new(ObjectStoreCache::new(
            store,
            config.cache_options(),
            JsonSerializer::new(),
        )))
    }
}

/// Handler for PUT /set
///
/// Stores a value, overwriting any existing entry.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> CacheResult<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .cache
        .set(&req.key, &req.value, req.timeout(), req.version)
        .await
        .inspect_err(|e| {
            if e.is_key_policy_violation() {
                debug!("Rejected write to '{}': {}", req.key, e);
            }
        })?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for POST /add
///
/// Stores a value only when no live entry exists.
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> CacheResult<Json<AddResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let added = state
        .cache
        .add(&req.key, &req.value, req.timeout(), req.version)
        .await?;

    Ok(Json(AddResponse::new(req.key, added)))
}

/// Handler for GET /get/*key
///
/// Retrieves a live value; missing, expired and unreadable entries are 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<VersionQuery>,
) -> CacheResult<Json<GetResponse>> {
    match state.cache.get(&key, None, query.version).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /has/*key
pub async fn has_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<VersionQuery>,
) -> CacheResult<Json<HasKeyResponse>> {
    let exists = state.cache.has_key(&key, query.version).await?;
    Ok(Json(HasKeyResponse::new(key, exists)))
}

/// Handler for DELETE /del/*key
///
/// Always succeeds for well-formed keys, whether or not the entry existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<VersionQuery>,
) -> CacheResult<Json<DeleteResponse>> {
    state.cache.delete(&key, query.version).await?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
