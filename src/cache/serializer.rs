//! Value Serializer Module
//!
//! The cache stores opaque bytes; turning values into bytes is left to a
//! pluggable serializer chosen by the integrator. Values are limited to what
//! that serializer can express.

use std::marker::PhantomData;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, CacheResult};

// == Value Serializer ==
/// Encodes cache values to bytes and back.
///
/// Implementations must round-trip exactly: `decode(encode(v)) == v`.
pub trait ValueSerializer: Send + Sync {
    /// Value type handled by this serializer
    type Value: Send + Sync;

    fn encode(&self, value: &Self::Value) -> CacheResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> CacheResult<Self::Value>;
}

// == JSON Serializer ==
/// Stores values as JSON documents.
pub struct JsonSerializer<T> {
    _value: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    pub fn new() -> Self {
        Self {
            _value: PhantomData,
        }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ValueSerializer for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    type Value = T;

    fn encode(&self, value: &T) -> CacheResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> CacheResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
    }
}

// == Raw Serializer ==
/// Identity codec for callers that already hold bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSerializer;

impl ValueSerializer for RawSerializer {
    type Value = Bytes;

    fn encode(&self, value: &Bytes) -> CacheResult<Vec<u8>> {
        Ok(value.to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> CacheResult<Bytes> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}
