use super::service::{CacheLookup, CacheResult, CacheService};
use crate::domain::entities::ShortLink;
use async_trait::async_trait;

/// Cache that stores nothing. Used when `REDIS_URL` is unset or Redis is down at startup.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _name: &str) -> CacheResult<CacheLookup> {
        Ok(CacheLookup::Miss { generation: 0 })
    }

    async fn set_link(&self, _name: &str, _link: &ShortLink, _generation: u64) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _name: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
