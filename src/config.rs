//! Configuration Module
//!
//! Handles loading cache configuration from environment variables and
//! exposes the named TTL profiles read paths choose from.

use std::env;
use std::time::Duration;

use crate::tasks::SweeperConfig;

// == TTL Profile Constants ==
/// Default TTL in seconds (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Long TTL in seconds (1 hour)
pub const LONG_TTL_SECS: u64 = 3600;

/// Short TTL in seconds (1 minute)
pub const SHORT_TTL_SECS: u64 = 60;

/// Default sweep interval in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Default retry interval after a failed sweep, in seconds
pub const DEFAULT_SWEEP_RETRY_SECS: u64 = 60;

// == TTL Profile ==
/// Named TTL profile a caller selects instead of an explicit duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlProfile {
    /// General purpose reads
    Default,
    /// Slow-changing reference data
    Long,
    /// Volatile, per-user data
    Short,
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for the `Default` profile
    pub default_ttl: u64,
    /// TTL in seconds for the `Long` profile
    pub long_ttl: u64,
    /// TTL in seconds for the `Short` profile
    pub short_ttl: u64,
    /// Sweeper interval in seconds
    pub sweep_interval: u64,
    /// Sweeper retry interval in seconds after a failed sweep
    pub sweep_retry_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` - Default profile TTL in seconds (default: 300)
    /// - `CACHE_LONG_TTL` - Long profile TTL in seconds (default: 3600)
    /// - `CACHE_SHORT_TTL` - Short profile TTL in seconds (default: 60)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `CACHE_SWEEP_RETRY_INTERVAL` - Retry delay after a failed sweep (default: 60)
    ///
    /// Missing, unparseable or zero values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            default_ttl: env_secs("CACHE_DEFAULT_TTL", DEFAULT_TTL_SECS),
            long_ttl: env_secs("CACHE_LONG_TTL", LONG_TTL_SECS),
            short_ttl: env_secs("CACHE_SHORT_TTL", SHORT_TTL_SECS),
            sweep_interval: env_secs("CACHE_SWEEP_INTERVAL", DEFAULT_SWEEP_INTERVAL_SECS),
            sweep_retry_interval: env_secs("CACHE_SWEEP_RETRY_INTERVAL", DEFAULT_SWEEP_RETRY_SECS),
        }
    }

    /// Returns the TTL for a named profile.
    pub fn ttl(&self, profile: TtlProfile) -> Duration {
        let secs = match profile {
            TtlProfile::Default => self.default_ttl,
            TtlProfile::Long => self.long_ttl,
            TtlProfile::Short => self.short_ttl,
        };
        Duration::from_secs(secs)
    }

    /// Builds the sweeper timing from this configuration.
    pub fn sweeper(&self) -> SweeperConfig {
        SweeperConfig {
            interval: Duration::from_secs(self.sweep_interval),
            retry_interval: Duration::from_secs(self.sweep_retry_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL_SECS,
            long_ttl: LONG_TTL_SECS,
            short_ttl: SHORT_TTL_SECS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
            sweep_retry_interval: DEFAULT_SWEEP_RETRY_SECS,
        }
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}
