//! S3 Express Cache - a TTL-aware cache on top of object storage
//!
//! Entries are stored one object per key. Each object starts with an 8-byte
//! expiration header, and keys may declare a maximum lifetime with a
//! `N-days:` directive that also groups them under a common path prefix.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::{CacheBackend, CacheOptions, ObjectStoreCache, Timeout};
pub use config::Config;
pub use error::{CacheError, CacheResult};
