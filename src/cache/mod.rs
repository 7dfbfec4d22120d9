//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and FIFO eviction.

mod bounded;
mod entry;
mod order;
mod store;


// Re-export public types
pub use bounded::BoundedTtlCache;
pub use entry::CacheEntry;
pub use order::FifoOrder;
pub use store::CacheStore;
