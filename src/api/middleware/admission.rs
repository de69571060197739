//! Per-client admission control for the public endpoints.
//!
//! Each guard counts the request against the `(client identity, request path)`
//! window before the handler runs. Denied requests never reach the handler, so
//! no redirect or click is recorded for them.
//!
//! Clients that send none of the identity headers share the `unknown` bucket.

use axum::{
    extract::{OriginalUri, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::application::services::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_identity;

/// Guard for `GET /{code}`.
pub async fn redirect_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limit = state.redirect_limit;
    enforce(&state, &limit, request, next).await
}

/// Guard for `POST /api/track-click/{item_id}`.
pub async fn track_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limit = state.track_limit;
    enforce(&state, &limit, request, next).await
}

async fn enforce(
    state: &AppState,
    limit: &RateLimitConfig,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = client_identity(request.headers());
    // Nested routers see a stripped URI; key on the path the client sent.
    let endpoint = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path(), |uri| uri.path())
        .to_string();

    let decision = state
        .admission
        .check_and_consume(&identity, &endpoint, limit);

    if !decision.allowed {
        metrics::counter!("admission_denied_total", "endpoint" => endpoint_label(&endpoint))
            .increment(1);
        warn!(
            client = %identity,
            endpoint = %endpoint,
            limit = decision.limit,
            "Rate limit exceeded"
        );

        return Err(AppError::RateLimited {
            limit: decision.limit,
            remaining: decision.remaining,
            retry_after_secs: decision.retry_after_secs(state.admission.now_millis()),
        });
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));

    Ok(response)
}

/// Collapses per-link paths so the metric label set stays bounded.
fn endpoint_label(path: &str) -> &'static str {
    if path.starts_with("/api/track-click/") {
        "track_click"
    } else {
        "redirect"
    }
}
