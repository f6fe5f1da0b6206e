//! Cache Module
//!
//! Object-store backed caching with expirations embedded in the stored bytes
//! and lifetimes bounded by time-bucket key directives.

mod backend;
mod clock;
pub mod expiry;
pub mod key;
mod serializer;
pub mod timeout;


// Re-export public types
pub use backend::{CacheBackend, CacheOptions, ObjectStoreCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use expiry::Expiration;
pub use serializer::{JsonSerializer, RawSerializer, ValueSerializer};
pub use timeout::{Timeout, Ttl};

// == Public Constants ==
/// Timeout applied to `Timeout::Default` unless configured otherwise
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
