//! Session configuration and the wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed session lifetime used when nothing else is configured: 24 hours.
pub const DEFAULT_LIFETIME_SECS: u64 = 86_400;

/// Configuration for session behavior.
///
/// `#[derive(Clone)]` because the issuer keeps one copy and the server
/// layer keeps another (to size the cookie's `Max-Age`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long (in seconds) a freshly issued session stays valid.
    ///
    /// Default: 86400 (one day). Tokens carry an absolute `exp`, so
    /// changing this only affects tokens issued afterwards.
    pub lifetime_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_secs: DEFAULT_LIFETIME_SECS,
        }
    }
}

/// Current Unix time in whole seconds.
///
/// A clock set before 1970 reads as 0, which makes every token look
/// expired rather than making any token look fresh.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
