#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkhub::application::services::{CreateListItem, CreateShortLink, RateLimitConfig};
use linkhub::domain::click_event::ClickEvent;
use linkhub::domain::clock::{Clock, ManualClock};
use linkhub::domain::entities::{ListItem, ListPage, ShortLink};
use linkhub::infrastructure::Repositories;
use linkhub::infrastructure::cache::{CacheService, NullCache};
use linkhub::infrastructure::memory::MemoryStore;
use linkhub::state::{AppState, StateSettings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

/// Everything a handler test needs: the state, the store behind it, the
/// clock driving it, and the receiving end of the click queue.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn start_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(StateSettings::default())
}

pub fn create_test_context_with(settings: StateSettings) -> TestContext {
    create_test_context_with_cache(settings, Arc::new(NullCache::new()))
}

pub fn create_test_context_with_cache(
    settings: StateSettings,
    cache: Arc<dyn CacheService>,
) -> TestContext {
    let clock = Arc::new(ManualClock::new(start_time()));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let store = Arc::new(MemoryStore::new(dyn_clock.clone()));
    let repositories = Repositories::from_store(store.clone());
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        &repositories,
        cache,
        dyn_clock,
        tx,
        settings,
    )
    .unwrap();

    TestContext {
        state,
        store,
        clock,
        clicks: rx,
    }
}

/// Settings with small admission windows so limits are easy to hit.
pub fn tight_limits(max_requests: u32) -> StateSettings {
    StateSettings {
        redirect_limit: RateLimitConfig::new(max_requests, 60_000),
        track_limit: RateLimitConfig::new(max_requests, 60_000),
        ..StateSettings::default()
    }
}

pub fn test_server(state: AppState) -> TestServer {
    let app: Router = linkhub::routes::router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

pub async fn create_test_link(state: &AppState, url: &str, alias: Option<&str>) -> ShortLink {
    state
        .link_service
        .create_short_link(CreateShortLink {
            target_url: url.to_string(),
            alias: alias.map(str::to_string),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub async fn create_test_page(state: &AppState, slug: &str) -> ListPage {
    state
        .list_service
        .create_page("My links", slug, None)
        .await
        .unwrap()
}

pub async fn create_test_item(state: &AppState, page_id: i64, title: &str) -> ListItem {
    state
        .list_service
        .add_item(
            page_id,
            CreateListItem {
                title: title.to_string(),
                target_url: format!("https://example.com/{}", title.to_lowercase()),
                visible: true,
            },
        )
        .await
        .unwrap()
}

/// Drains every click currently queued.
pub fn drain_clicks(rx: &mut mpsc::Receiver<ClickEvent>) -> Vec<ClickEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Supplies the peer address the `/api` token bucket keys on.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
