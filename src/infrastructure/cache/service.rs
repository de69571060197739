//! Cache contract for redirect lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ShortLink;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache operation error: {0}")]
    Operation(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(ShortLink),
    /// Nothing current is cached. A later [`CacheService::set_link`] for this
    /// name must carry `generation` so it cannot outlive an invalidation.
    Miss { generation: u64 },
}

/// Stored form of a cache entry: the link stamped with the name's generation
/// at the time of the miss that loaded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLink {
    pub generation: u64,
    pub link: ShortLink,
}

impl CachedLink {
    pub fn new(link: ShortLink, generation: u64) -> Self {
        Self { generation, link }
    }

    /// The link, unless the name was invalidated after this entry's miss.
    pub fn current(self, generation: u64) -> Option<ShortLink> {
        (self.generation == generation).then_some(self.link)
    }
}

/// TTL for an entry: the default, capped at the time left before the link
/// expires. `None` means the entry must not be written.
pub fn entry_ttl(link: &ShortLink, default_ttl: u64, now: DateTime<Utc>) -> Option<u64> {
    match link.expires_at {
        None => Some(default_ttl),
        Some(expires_at) => {
            let remaining = (expires_at - now).num_seconds();
            (remaining > 0).then(|| default_ttl.min(remaining.unsigned_abs()))
        }
    }
}

/// Read-through cache of short links keyed by name (code or alias).
///
/// Every name carries a generation counter. [`invalidate`](Self::invalidate)
/// bumps it and [`get_link`](Self::get_link) ignores entries stamped with an
/// older one, so a write racing an update can never serve the old link.
///
/// A read error is returned rather than reported as a miss: without a
/// generation the caller cannot cache safely and goes to storage alone. A
/// cached link may be stale on `click_count`; callers re-check `active` and
/// `expires_at`.
#[async_trait]
pub trait CacheService: Send + Sync {
    async fn get_link(&self, name: &str) -> CacheResult<CacheLookup>;

    /// Stores `link` under `name`, stamped with the generation from the miss.
    async fn set_link(&self, name: &str, link: &ShortLink, generation: u64) -> CacheResult<()>;

    /// Advances the generation of `name` and drops its entry.
    async fn invalidate(&self, name: &str) -> CacheResult<()>;

    async fn health_check(&self) -> bool;
}
