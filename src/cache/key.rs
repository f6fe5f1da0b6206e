//! Key Codec Module
//!
//! Maps a logical cache key to the path of the object that stores it.
//!
//! A logical key may open with a time-bucket directive such as `7-days:` or
//! `1-day/`. The leading integer is the longest lifetime, in days, that any
//! entry under the key may be written with. Object stores that partition by
//! key prefix spread writes better when the directive is its own path
//! segment, so the `:` delimiter is rewritten to `/`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CacheError, CacheResult};

/// Directive followed by the original `:` delimiter.
static COLON_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+-days?):(.*)$").expect("valid directive regex"));

/// Directive with either delimiter, capturing the day count.
static BUCKET_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-days?[:/](.*)$").expect("valid directive regex"));

// == Rewrite Time Bucket ==
/// Replaces the colon after a leading `N-days` directive with a slash.
///
/// Keys without a directive are returned unchanged.
pub fn rewrite_time_bucket(key: &str) -> String {
    match COLON_DIRECTIVE.captures(key) {
        Some(caps) => format!("{}/{}", &caps[1], &caps[2]),
        None => key.to_string(),
    }
}

// == Parse Bucket Days ==
/// Returns the day count declared by the key's directive.
///
/// Accepts both the original (`7-days:k`) and rewritten (`7-days/k`) forms.
pub fn parse_bucket_days(key: &str) -> CacheResult<u64> {
    BUCKET_DIRECTIVE
        .captures(key)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .ok_or_else(|| CacheError::MalformedKey {
            key: key.to_string(),
        })
}

// == Build Path ==
/// Builds the storage path for a key.
///
/// Layout: `[{prefix}/]{rewritten key}[_{version}]`.
pub fn build_path(key: &str, prefix: Option<&str>, version: Option<u64>) -> String {
    let mut path = rewrite_time_bucket(key);
    if let Some(version) = version {
        path.push('_');
        path.push_str(&version.to_string());
    }
    match prefix {
        Some(prefix) => format!("{}/{}", prefix, path),
        None => path,
    }
}
