//! Environment variable configuration helpers.
//!
//! All scall settings come from `SCALL_*` variables. Unset or unparsable
//! values fall back to the supplied default.
//!
//! ```ignore
//! use scall_core::env::{env_get_bool, env_get_list};
//!
//! let preload = env_get_list("SCALL_PRELOAD");        // "open, close stat"
//! let restart = env_get_bool("SCALL_RESTART_EINTR", true);
//! ```

use std::str::FromStr;

/// Parse `key` as `T`, or return `default`.
#[inline]
pub fn env_get<T: FromStr>(key: &str, default: T) -> T {
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T`; `None` if unset or unparsable.
#[inline]
pub fn env_get_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Boolean flag. "1", "true", "yes", "on" are true and "0", "false", "no",
/// "off" are false (case-insensitive); anything else yields `default`.
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Comma- or whitespace-separated list. Empty items are dropped; order is kept.
pub fn env_get_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| split_list(&v))
        .unwrap_or_default()
}

/// Split a `"a, b c"` style list.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}
