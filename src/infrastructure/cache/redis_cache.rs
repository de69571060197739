use super::service::{
    CacheError, CacheLookup, CacheResult, CacheService, CachedLink, entry_ttl,
};
use crate::domain::entities::ShortLink;
use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "link:";
const GENERATION_PREFIX: &str = "linkgen:";

/// Redis cache storing links as JSON under `link:<name>`, with the name's
/// generation counter under `linkgen:<name>`.
///
/// Generation keys live for twice the entry TTL after their last bump, which
/// outlasts any entry written by a miss that predates the bump.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects and verifies the server with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid or the server is unreachable.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("invalid Redis URL: {e}")))?;

        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("PING failed: {e}")))?;

        info!(ttl_seconds = default_ttl_seconds, "Connected to Redis");

        Ok(Self {
            conn,
            default_ttl: default_ttl_seconds,
        })
    }

    fn key(name: &str) -> String {
        format!("{KEY_PREFIX}{name}")
    }

    fn generation_key(name: &str) -> String {
        format!("{GENERATION_PREFIX}{name}")
    }

    fn generation_ttl(&self) -> i64 {
        i64::try_from(self.default_ttl.saturating_mul(2)).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, name: &str) -> CacheResult<CacheLookup> {
        let mut conn = self.conn.clone();

        let (raw, generation): (Option<String>, Option<u64>) = redis::pipe()
            .get(Self::key(name))
            .get(Self::generation_key(name))
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Operation(format!("GET failed: {e}")))?;
        let generation = generation.unwrap_or(0);

        let Some(raw) = raw else {
            debug!(name, "Cache miss");
            return Ok(CacheLookup::Miss { generation });
        };

        match serde_json::from_str::<CachedLink>(&raw) {
            Ok(entry) => match entry.current(generation) {
                Some(link) => {
                    debug!(name, "Cache hit");
                    Ok(CacheLookup::Hit(link))
                }
                None => {
                    debug!(name, generation, "Ignoring cache entry from an older generation");
                    Ok(CacheLookup::Miss { generation })
                }
            },
            Err(e) => {
                warn!(name, error = %e, "Discarding undecodable cache entry");
                Ok(CacheLookup::Miss { generation })
            }
        }
    }

    async fn set_link(&self, name: &str, link: &ShortLink, generation: u64) -> CacheResult<()> {
        let Some(ttl) = entry_ttl(link, self.default_ttl, Utc::now()) else {
            return Ok(());
        };
        let payload = serde_json::to_string(&CachedLink::new(link.clone(), generation))
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        let mut conn = self.conn.clone();

        if let Err(e) = conn.set_ex::<_, _, ()>(Self::key(name), payload, ttl).await {
            warn!(name, error = %e, "Redis SET failed");
        }
        Ok(())
    }

    async fn invalidate(&self, name: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let generation_key = Self::generation_key(name);

        redis::pipe()
            .atomic()
            .incr(generation_key.as_str(), 1)
            .ignore()
            .expire(generation_key.as_str(), self.generation_ttl())
            .ignore()
            .del(Self::key(name))
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| CacheError::Operation(format!("invalidation failed: {e}")))?;

        debug!(name, "Cache entry invalidated");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
