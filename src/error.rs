//! Error types for cache configuration
//!
//! Cache operations themselves are total and never fail; the only fallible
//! surface is turning external configuration into a `CacheConfig`.

use thiserror::Error;

// == Config Error Enum ==
/// Errors raised while loading cache configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed as a non-negative integer
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        /// Name of the offending variable
        var: &'static str,
        /// The raw value as it was supplied
        value: String,
        /// Parser message
        reason: String,
    },
}

// == Result Type Alias ==
/// Convenience Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
