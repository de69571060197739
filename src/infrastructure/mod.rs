//! Infrastructure layer: concrete implementations of the domain traits.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (Redis and no-op)
//! - [`memory`] - In-process repositories and the admission window store
//! - [`persistence`] - PostgreSQL repositories

pub mod cache;
pub mod memory;
pub mod persistence;

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::clock::Clock;
use crate::domain::repositories::{
    AnalyticsRepository, ClickRepository, LinkRepository, ListRepository,
};
use memory::MemoryStore;
use persistence::{PgAnalyticsRepository, PgClickRepository, PgLinkRepository, PgListRepository};

/// One implementation of every repository, chosen at startup.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            lists: Arc::new(PgListRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool.clone())),
            analytics: Arc::new(PgAnalyticsRepository::new(pool)),
        }
    }

    /// All four traits backed by a single shared [`MemoryStore`].
    pub fn memory(clock: Arc<dyn Clock>) -> Self {
        Self::from_store(Arc::new(MemoryStore::new(clock)))
    }

    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self {
            links: store.clone(),
            lists: store.clone(),
            clicks: store.clone(),
            analytics: store,
        }
    }
}
