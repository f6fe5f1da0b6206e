//! Cache Backend Module
//!
//! Object-store backed cache combining the key codec, the timeout policy and
//! the expiry codec. Each operation is a single independent round trip to the
//! store (two for `add`); the backend itself holds no mutable state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{path::Path, ObjectStore, PutPayload};
use tracing::{debug, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::expiry::{self, HEADER_LEN};
use crate::cache::key::build_path;
use crate::cache::serializer::ValueSerializer;
use crate::cache::timeout::{self, Timeout, Ttl};
use crate::cache::DEFAULT_TIMEOUT_SECS;
use crate::error::{CacheError, CacheResult};

// == Cache Backend ==
/// The cache contract consumed by request-caching layers.
///
/// `version` selects an independent namespace for the same logical key;
/// `None` falls back to the backend's configured version.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    type Value: Send + Sync;

    /// Returns the stored value, or `default` when the entry is absent,
    /// expired or unreadable.
    async fn get(
        &self,
        key: &str,
        default: Option<Self::Value>,
        version: Option<u64>,
    ) -> CacheResult<Option<Self::Value>>;

    /// Stores a value, overwriting any existing entry.
    async fn set(
        &self,
        key: &str,
        value: &Self::Value,
        timeout: Timeout,
        version: Option<u64>,
    ) -> CacheResult<()>;

    /// Stores a value only if no live entry exists. Returns whether it wrote.
    ///
    /// The existence check and the write are separate requests: two
    /// concurrent `add` calls for the same key can both succeed, and the
    /// store's last write wins.
    async fn add(
        &self,
        key: &str,
        value: &Self::Value,
        timeout: Timeout,
        version: Option<u64>,
    ) -> CacheResult<bool>;

    /// Removes an entry. Succeeds whether or not it existed.
    async fn delete(&self, key: &str, version: Option<u64>) -> CacheResult<bool>;

    /// Checks for a live entry by reading only its expiration header.
    async fn has_key(&self, key: &str, version: Option<u64>) -> CacheResult<bool>;
}

// == Cache Options ==
/// Immutable settings of a cache instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    /// Global prefix prepended to every storage path
    pub key_prefix: Option<String>,
    /// Version used when a call does not pass one
    pub version: Option<u64>,
    /// Timeout applied for `Timeout::Default`
    pub default_timeout: Ttl,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            key_prefix: None,
            version: None,
            default_timeout: Ttl::Seconds(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// == Object Store Cache ==
/// Cache storing one object per entry in an `object_store` backend.
pub struct ObjectStoreCache<S: ValueSerializer> {
    store: Arc<dyn ObjectStore>,
    options: CacheOptions,
    serializer: S,
    clock: Arc<dyn Clock>,
}

impl<S: ValueSerializer> ObjectStoreCache<S> {
    // == Constructor ==
    /// Creates a cache over `store` using the system clock.
    pub fn new(store: Arc<dyn ObjectStore>, options: CacheOptions, serializer: S) -> Self {
        Self {
            store,
            options,
            serializer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for stamping and checking expirations.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // == Storage Path ==
    /// Resolves the object path for a key and version.
    pub fn storage_path(&self, key: &str, version: Option<u64>) -> CacheResult<Path> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
        }
        let version = version.or(self.options.version);
        let path = build_path(key, self.options.key_prefix.as_deref(), version);
        Ok(Path::from(path))
    }

    // == Get Many ==
    /// Fetches several keys; only live entries appear in the result.
    pub async fn get_many(
        &self,
        keys: &[&str],
        version: Option<u64>,
    ) -> CacheResult<HashMap<String, S::Value>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key, None, version).await? {
                found.insert(key.to_string(), value);
            }
        }
        Ok(found)
    }

    // == Delete Many ==
    /// Deletes several keys.
    pub async fn delete_many(&self, keys: &[&str], version: Option<u64>) -> CacheResult<()> {
        for key in keys {
            self.delete(key, version).await?;
        }
        Ok(())
    }

    /// Full read of an object; `None` when it does not exist.
    async fn fetch(&self, path: &Path) -> CacheResult<Option<Bytes>> {
        let result = match self.store.get(path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match result.bytes().await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Header-only read; `None` when the object does not exist.
    ///
    /// Stores refuse a range starting past the end of the object, so a failed
    /// range read is checked against the object size: anything shorter than
    /// the header comes back as an empty header instead of an error.
    async fn fetch_header(&self, path: &Path) -> CacheResult<Option<Bytes>> {
        let range_err = match self.store.get_range(path, 0..HEADER_LEN as u64).await {
            Ok(bytes) => return Ok(Some(bytes)),
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => e,
        };
        match self.store.head(path).await {
            Ok(meta) if meta.size < HEADER_LEN as u64 => Ok(Some(Bytes::new())),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            _ => Err(range_err.into()),
        }
    }
}

#[async_trait]
impl<S: ValueSerializer> CacheBackend for ObjectStoreCache<S> {
    type Value = S::Value;

    async fn get(
        &self,
        key: &str,
        default: Option<S::Value>,
        version: Option<u64>,
    ) -> CacheResult<Option<S::Value>> {
        let path = self.storage_path(key, version)?;

        let Some(bytes) = self.fetch(&path).await? else {
            debug!("GET {}: miss", path);
            return Ok(default);
        };

        let Some((expiration, payload)) = expiry::split(bytes) else {
            warn!("GET {}: object shorter than its header, treating as miss", path);
            return Ok(default);
        };

        let now = self.clock.now();
        if expiration.is_expired_at(now) {
            debug!("GET {}: expired", path);
            return Ok(default);
        }

        if payload.is_empty() {
            debug!("GET {}: empty payload, treating as miss", path);
            return Ok(default);
        }

        match self.serializer.decode(&payload) {
            Ok(value) => {
                match expiration.remaining(now) {
                    Some(left) => debug!("GET {}: hit, {:.0}s left", path, left),
                    None => debug!("GET {}: hit, persistent", path),
                }
                Ok(Some(value))
            }
            Err(e) => {
                warn!("GET {}: undecodable payload ({}), treating as miss", path, e);
                Ok(default)
            }
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &S::Value,
        timeout: Timeout,
        version: Option<u64>,
    ) -> CacheResult<()> {
        let path = self.storage_path(key, version)?;

        let ttl = timeout::normalize(timeout, self.options.default_timeout);
        timeout::validate_against_key(ttl, key)?;
        let expiration = timeout::absolute_expiration(ttl, self.clock.now());

        let payload = self.serializer.encode(value)?;
        let framed = expiry::encode(expiration, &payload);

        self.store
            .put(&path, PutPayload::from_bytes(framed))
            .await?;

        debug!("SET {}: {} payload bytes, ttl {:?}", path, payload.len(), ttl);
        Ok(())
    }

    async fn add(
        &self,
        key: &str,
        value: &S::Value,
        timeout: Timeout,
        version: Option<u64>,
    ) -> CacheResult<bool> {
        if self.has_key(key, version).await? {
            debug!("ADD {}: live entry present, skipping", key);
            return Ok(false);
        }
        self.set(key, value, timeout, version).await?;
        Ok(true)
    }

    async fn delete(&self, key: &str, version: Option<u64>) -> CacheResult<bool> {
        let path = self.storage_path(key, version)?;
        match self.store.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => {
                debug!("DELETE {}", path);
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn has_key(&self, key: &str, version: Option<u64>) -> CacheResult<bool> {
        let path = self.storage_path(key, version)?;

        let Some(header) = self.fetch_header(&path).await? else {
            return Ok(false);
        };

        match expiry::decode_header(&header) {
            Some(expiration) => {
                let now = self.clock.now();
                let live = !expiration.is_expired_at(now);
                debug!(
                    "HAS {}: live={}, remaining {:?}",
                    path,
                    live,
                    expiration.remaining(now)
                );
                Ok(live)
            }
            None => {
                warn!("HAS {}: object shorter than its header, treating as miss", path);
                Ok(false)
            }
        }
    }
}
