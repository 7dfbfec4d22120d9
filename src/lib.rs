//! Bounded TTL Cache - an embeddable in-memory key-value cache
//!
//! Every entry lives for a fixed TTL after its last write, and the cache
//! holds at most `capacity` entries, evicting in FIFO order by last write.
//! Expiry is checked lazily when a key is read; nothing runs in the background.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;

pub use cache::BoundedTtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{ConfigError, Result};
