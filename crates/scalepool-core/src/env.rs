//! Environment variable parsing helpers.
//!
//! Adapted from `gvthread_core::env`: a generic `env_get<T>` used to layer
//! `SCALEPOOL_*` overrides on top of compiled-in defaults.

use std::str::FromStr;

/// Get an environment variable parsed as `T`, or `default` if unset/unparsable.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get an environment variable as a boolean.
///
/// Accepts `"1"`, `"true"`, `"yes"`, `"on"` (case-insensitive) as true.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
