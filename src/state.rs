//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{
    AdmissionController, AnalyticsService, ClickRecorder, LinkService, ListService,
    RateLimitConfig,
};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::clock::Clock;
use crate::domain::repositories::{AnalyticsRepository, LinkRepository, ListRepository};
use crate::error::AppError;
use crate::infrastructure::Repositories;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::memory::DashMapWindowStore;
use crate::utils::code_generator::DEFAULT_CODE_LENGTH;

/// Tunables that shape the state, separate from process-level [`Config`].
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub code_length: usize,
    pub redirect_limit: RateLimitConfig,
    pub track_limit: RateLimitConfig,
    pub rate_limit_max_entries: usize,
    pub public_base_url: String,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            redirect_limit: RateLimitConfig::new(100, 60_000),
            track_limit: RateLimitConfig::new(30, 60_000),
            rate_limit_max_entries: 10_000,
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl From<&Config> for StateSettings {
    fn from(config: &Config) -> Self {
        Self {
            code_length: config.code_length,
            redirect_limit: config.redirect_limit,
            track_limit: config.track_limit,
            rate_limit_max_entries: config.rate_limit_max_entries,
            public_base_url: config.public_base_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub list_service: Arc<ListService<dyn ListRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn AnalyticsRepository>>,
    pub click_recorder: ClickRecorder,
    pub admission: Arc<AdmissionController>,
    pub redirect_limit: RateLimitConfig,
    pub track_limit: RateLimitConfig,
    pub cache: Arc<dyn CacheService>,
    pub public_base_url: String,
}

impl AppState {
    /// Wires services over `repositories`. The click worker owns the other end
    /// of `click_sender`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the configured code length is out of range.
    pub fn new(
        repositories: &Repositories,
        cache: Arc<dyn CacheService>,
        clock: Arc<dyn Clock>,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: StateSettings,
    ) -> Result<Self, AppError> {
        let link_service = LinkService::new(repositories.links.clone(), clock.clone())
            .with_code_length(settings.code_length)?;

        let admission = AdmissionController::new(
            Arc::new(DashMapWindowStore::new()),
            clock.clone(),
            settings.rate_limit_max_entries,
        );

        Ok(Self {
            link_service: Arc::new(link_service),
            list_service: Arc::new(ListService::new(repositories.lists.clone())),
            analytics_service: Arc::new(AnalyticsService::new(
                repositories.analytics.clone(),
                clock.clone(),
            )),
            click_recorder: ClickRecorder::new(click_sender, clock),
            admission: Arc::new(admission),
            redirect_limit: settings.redirect_limit,
            track_limit: settings.track_limit,
            cache,
            public_base_url: settings.public_base_url,
        })
    }

    /// Public URL for a short link name.
    pub fn short_url(&self, name: &str) -> String {
        format!("{}/{}", self.public_base_url, name)
    }
}
