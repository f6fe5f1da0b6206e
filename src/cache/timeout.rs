//! Timeout Policy Module
//!
//! Normalizes caller timeouts and checks them against the lifetime declared
//! by a key's time-bucket directive.

use tracing::debug;

use crate::cache::expiry::Expiration;
use crate::cache::key::parse_bucket_days;
use crate::error::{CacheError, CacheResult};

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 86_400;

// == Timeout ==
/// Timeout requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Use the backend's configured default
    #[default]
    Default,
    /// Store the entry without expiration
    Never,
    /// Expire after this many seconds; zero or negative expires immediately
    Seconds(i64),
}

impl Timeout {
    /// Timeout of a whole number of days.
    pub fn days(days: i64) -> Self {
        Timeout::Seconds(days.saturating_mul(SECONDS_PER_DAY as i64))
    }
}

// == Ttl ==
/// Normalized timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Persistent,
    Seconds(u64),
}

impl Ttl {
    pub fn is_persistent(&self) -> bool {
        matches!(self, Ttl::Persistent)
    }
}

// == Normalize ==
/// Resolves a requested timeout against the backend default.
pub fn normalize(requested: Timeout, default: Ttl) -> Ttl {
    match requested {
        Timeout::Default => default,
        Timeout::Never => Ttl::Persistent,
        Timeout::Seconds(seconds) => Ttl::Seconds(seconds.max(0) as u64),
    }
}

// == Validate Against Key ==
/// Rejects a ttl that outlives the key's `N-days` directive.
///
/// Persistent entries are exempt. Any other ttl requires the logical key to
/// carry a directive, and its whole-day count must not exceed N.
pub fn validate_against_key(ttl: Ttl, key: &str) -> CacheResult<()> {
    let Ttl::Seconds(seconds) = ttl else {
        return Ok(());
    };

    let max_days = parse_bucket_days(key)?;
    let requested_days = seconds / SECONDS_PER_DAY;
    if requested_days > max_days {
        debug!(
            "Rejecting ttl of {}s for key '{}': bucket allows {} day(s)",
            seconds, key, max_days
        );
        return Err(CacheError::TimeoutExceedsKeyLifetime {
            key: key.to_string(),
            requested_days,
            max_days,
        });
    }
    Ok(())
}

// == Absolute Expiration ==
/// Converts a ttl into the expiration stored in the object header.
pub fn absolute_expiration(ttl: Ttl, now: f64) -> Expiration {
    match ttl {
        Ttl::Persistent => Expiration::Persistent,
        Ttl::Seconds(seconds) => Expiration::At(now + seconds as f64),
    }
}
