//! Top-level router.
//!
//! # Route Structure
//!
//! - `GET  /{code}`                 - Redirect (redirect admission policy)
//! - `GET  /health`                 - Storage, click queue, cache status
//! - `POST /api/track-click/{id}`   - List item click (tracking admission policy)
//! - `/api/*`                       - Management and analytics (token bucket per peer)
//!
//! # Middleware
//!
//! - **Tracing** - Span per request with status and latency
//! - **Admission** - Fixed-window guards on the public endpoints
//! - **Rate limiting** - Token bucket on management routes
//! - **Path normalization** - Trailing slash trimmed before routing

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{admission, rate_limit, tracing};
use crate::api::routes::{management_routes, tracking_routes};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router without path normalization.
pub fn router(state: AppState) -> Router {
    let redirect = Router::new()
        .route("/{code}", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admission::redirect_guard,
        ));

    let api = management_routes()
        .layer(rate_limit::secure_layer())
        .merge(tracking_routes(&state));

    Router::new()
        .merge(redirect)
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
        .layer(tracing::layer())
}

/// The served application: [`router`] behind trailing-slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
