//! Object store construction.
//!
//! Turns a store URL into an `object_store` client:
//!
//! ```text
//! s3://my-bucket--usw2-az1--x-s3/cache?region=us-west-2   # S3 Express One Zone
//! s3://my-bucket/cache                                    # S3 standard
//! file:///var/cache/pages
//! memory://                                               # for testing
//! ```
//!
//! A URL path becomes the storage root every cache path is placed under.
//! Credentials are read from the standard AWS environment.

use std::sync::Arc;

use object_store::{aws::AmazonS3Builder, prefix::PrefixStore, ObjectStore};
use tracing::info;

use crate::error::{CacheError, CacheResult};

/// Suffix AWS requires on S3 Express One Zone directory bucket names.
const S3_EXPRESS_SUFFIX: &str = "--x-s3";

/// Parsed store URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSpec {
    /// The scheme (s3, file, memory)
    pub scheme: String,
    /// Bucket name (empty for file:// and memory://)
    pub bucket: Option<String>,
    /// Root path within the bucket
    pub root: String,
    /// Optional region (for S3)
    pub region: Option<String>,
}

impl StoreSpec {
    /// Parse a store URL like `s3://bucket/root` or `file:///path`.
    pub fn parse(url: &str) -> CacheResult<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| CacheError::InvalidConfig(format!("store URL '{}': {}", url, e)))?;

        let scheme = parsed.scheme().to_string();
        let bucket = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .map(|host| host.to_string());
        let root = parsed.path().trim_matches('/').to_string();
        let region = parsed
            .query_pairs()
            .find(|(k, _)| k == "region")
            .map(|(_, v)| v.to_string());

        Ok(Self {
            scheme,
            bucket,
            root,
            region,
        })
    }

    /// Whether the bucket is an S3 Express One Zone directory bucket.
    pub fn is_s3_express(&self) -> bool {
        self.scheme == "s3"
            && self
                .bucket
                .as_deref()
                .is_some_and(|bucket| bucket.ends_with(S3_EXPRESS_SUFFIX))
    }
}

// == Open Store ==
/// Builds the object store described by `spec`.
pub fn open_store(spec: &StoreSpec) -> CacheResult<Arc<dyn ObjectStore>> {
    match spec.scheme.as_str() {
        "memory" => {
            info!("Using in-memory object store");
            Ok(Arc::new(object_store::memory::InMemory::new()))
        }
        "file" => {
            let dir = format!("/{}", spec.root);
            std::fs::create_dir_all(&dir).map_err(|e| {
                CacheError::InvalidConfig(format!("cannot create store directory {}: {}", dir, e))
            })?;
            let store = object_store::local::LocalFileSystem::new_with_prefix(&dir)?;
            info!("Using local object store at {}", dir);
            Ok(Arc::new(store))
        }
        "s3" => {
            let bucket = spec.bucket.as_ref().ok_or_else(|| {
                CacheError::InvalidConfig("s3 store URL must include a bucket name".to_string())
            })?;

            let mut builder = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .with_s3_express(spec.is_s3_express());
            if let Some(region) = &spec.region {
                builder = builder.with_region(region);
            }
            let store = builder.build()?;

            info!(
                "Using S3 bucket {} (express: {}, root: '{}')",
                bucket,
                spec.is_s3_express(),
                spec.root
            );
            Ok(with_root(Arc::new(store), &spec.root))
        }
        scheme => Err(CacheError::InvalidConfig(format!(
            "unsupported store scheme: {}",
            scheme
        ))),
    }
}

/// Nests every path under `root` when one is given.
fn with_root(store: Arc<dyn ObjectStore>, root: &str) -> Arc<dyn ObjectStore> {
    if root.is_empty() {
        store
    } else {
        Arc::new(PrefixStore::new(store, root))
    }
}
