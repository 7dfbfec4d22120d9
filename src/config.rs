//! Configuration Module
//!
//! Capacity and TTL parameters for a cache, loadable from environment
//! variables or deserialized as part of a host application's config.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Environment variable holding the maximum number of entries.
pub const CAPACITY_VAR: &str = "CACHE_CAPACITY";

/// Environment variable holding the entry lifespan in milliseconds.
pub const TTL_MS_VAR: &str = "CACHE_TTL_MS";

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_TTL_MS: u64 = 300_000;

/// Cache construction parameters.
///
/// Missing fields fall back to the defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Lifespan of every entry in milliseconds
    pub ttl_ms: u64,
}

impl CacheConfig {
    /// Creates a config from explicit values.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Loads the config from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - Entry lifespan in milliseconds (default: 300000)
    ///
    /// Unset variables use their default. A variable that is set but is not a
    /// non-negative integer is rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Loads the config through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            capacity: parse_var(&lookup, CAPACITY_VAR)?.unwrap_or(defaults.capacity),
            ttl_ms: parse_var(&lookup, TTL_MS_VAR)?.unwrap_or(defaults.ttl_ms),
        })
    }

    /// Entry lifespan as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl_ms: DEFAULT_TTL_MS,
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
