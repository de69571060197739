//! Handler for short link redirects.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::{debug, warn};

use crate::domain::click_event::ClickTarget;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::infrastructure::cache::CacheLookup;
use crate::state::AppState;

/// Redirects a code or alias to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Admission guard has already counted the request (see `middleware::admission`)
/// 2. Look the name up in the cache, then in storage on a miss
/// 3. Re-check `active` and `expiresAt` against the current time
/// 4. Queue a click for the background worker without waiting
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns the same 404 for unknown, inactive, and expired links.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let link = resolve_cached(&state, &code).await?;

    state.click_recorder.record(ClickTarget::ShortLink(link.id));

    Ok(Redirect::temporary(&link.target_url))
}

async fn resolve_cached(state: &AppState, name: &str) -> Result<ShortLink, AppError> {
    let generation = match state.cache.get_link(name).await {
        Ok(CacheLookup::Hit(link)) => return state.link_service.ensure_resolvable(link),
        Ok(CacheLookup::Miss { generation }) => {
            debug!(name, "Resolving from storage");
            Some(generation)
        }
        Err(e) => {
            warn!(name, error = %e, "Cache lookup failed, falling back to storage");
            None
        }
    };

    let link = state.link_service.resolve(name).await?;

    // The generation read before storage keeps a write that loses a race with
    // an update from ever being served.
    if let Some(generation) = generation {
        let cache = state.cache.clone();
        let key = name.to_string();
        let cached = link.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_link(&key, &cached, generation).await {
                warn!(name = %key, error = %e, "Failed to cache link");
            }
        });
    }

    Ok(link)
}
