//! Handlers for short link management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::error;
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, LinkListResponse, ShortLinkResponse, UpdateLinkRequest,
};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::application::services::CreateShortLink;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "https://example.com/docs",
///   "alias": "docs",                       // optional
///   "description": "Product docs",         // optional
///   "expiresAt": "2027-01-01T00:00:00Z"    // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 for an invalid URL, alias, description, or a past expiry
/// - 409 if the alias is already taken as a code or alias
/// - 503 if no free code could be generated
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ShortLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            target_url: payload.target_url,
            alias: payload.alias,
            description: payload.description,
            tags: payload.tags,
            expires_at: payload.expires_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// `GET /api/links?page=&pageSize=`, newest first.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (offset, limit) = params.offset_limit()?;
    let (links, total) = state.link_service.list_links(offset, limit).await?;

    Ok(Json(LinkListResponse {
        items: links
            .into_iter()
            .map(|link| to_response(&state, link))
            .collect(),
        pagination: PaginationMeta::new(&params, total),
    }))
}

pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ShortLinkResponse>, AppError> {
    let link = state.link_service.get_link(id).await?;
    Ok(Json(to_response(&state, link)))
}

/// Partially updates a short link.
///
/// `PATCH /api/links/{id}`. Every cached name of the link is invalidated so
/// the next redirect sees the change.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<ShortLinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update_link(id, payload.into()).await?;
    invalidate_names(&state, &link).await;

    Ok(Json(to_response(&state, link)))
}

/// Deletes a short link. Its click events stay in the daily series.
///
/// `DELETE /api/links/{id}` returns 204.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let link = state.link_service.delete_link(id).await?;
    invalidate_names(&state, &link).await;

    Ok(StatusCode::NO_CONTENT)
}

fn to_response(state: &AppState, link: ShortLink) -> ShortLinkResponse {
    let short_url = state.short_url(link.display_name());
    ShortLinkResponse::new(link, short_url)
}

/// A failed invalidation leaves the old entry live until its TTL runs out.
async fn invalidate_names(state: &AppState, link: &ShortLink) {
    for name in link.names() {
        if let Err(e) = state.cache.invalidate(name).await {
            error!(
                name,
                link_id = link.id,
                error = %e,
                "Failed to invalidate cached link; redirects may be stale until the entry expires"
            );
        }
    }
}
