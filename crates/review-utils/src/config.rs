//! Environment lookup helpers
//!
//! Configuration is read once at the process edge. Everything below takes a
//! lookup function instead of calling `std::env` directly so that callers can
//! feed a fixed map in tests.

use std::str::FromStr;

/// Look a key up in the process environment
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Look a key up and drop it when blank
///
/// An exported-but-empty variable counts as absent, matching how credential
/// slots are treated.
pub fn lookup_nonempty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Look a key up and parse it, falling back to `default` when absent or invalid
pub fn lookup_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup_nonempty(lookup, key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
