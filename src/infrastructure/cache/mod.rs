//! Redirect lookup cache.
//!
//! - [`RedisCache`] when `REDIS_URL` is configured and reachable
//! - [`NullCache`] otherwise

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheLookup, CacheResult, CacheService, CachedLink, entry_ttl};
