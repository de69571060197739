//! Handlers for link-in-bio pages and their items.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::lists::{
    CreateListItemRequest, CreateListPageRequest, ListItemResponse, ListPageListResponse,
    ListPageResponse, UpdateListItemRequest, UpdateListPageRequest,
};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::application::services::CreateListItem;
use crate::domain::entities::ListPageWithItems;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a page.
///
/// # Endpoint
///
/// `POST /api/lists`
///
/// ```json
/// { "title": "My links", "slug": "my-links", "description": "Everything I ship" }
/// ```
///
/// # Errors
///
/// Returns 409 if the slug is taken.
pub async fn create_list_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateListPageRequest>,
) -> Result<(StatusCode, Json<ListPageResponse>), AppError> {
    payload.validate()?;

    let page = state
        .list_service
        .create_page(&payload.title, &payload.slug, payload.description.as_deref())
        .await?;

    let response = ListPageWithItems {
        page,
        items: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(response.into())))
}

/// `GET /api/lists?page=&pageSize=`, newest first, with item counts.
pub async fn list_lists_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListPageListResponse>, AppError> {
    let (offset, limit) = params.offset_limit()?;
    let (pages, total) = state.list_service.list_pages(offset, limit).await?;

    Ok(Json(ListPageListResponse {
        lists: pages.into_iter().map(Into::into).collect(),
        pagination: PaginationMeta::new(&params, total),
    }))
}

/// Updates a page's title, slug, or description.
///
/// `PUT /api/lists/{id}`. Returns the page with its items; 409 if the new slug is taken.
pub async fn update_list_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateListPageRequest>,
) -> Result<Json<ListPageResponse>, AppError> {
    payload.validate()?;

    let page = state.list_service.update_page(id, payload.into()).await?;
    Ok(Json(page.into()))
}

/// `GET /api/lists/{id}`: the page with its items in display order.
pub async fn get_list_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ListPageResponse>, AppError> {
    Ok(Json(state.list_service.get_page(id).await?.into()))
}

pub async fn delete_list_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.list_service.delete_page(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/lists/{id}/items`: appends an item after the last one.
pub async fn add_item_handler(
    Path(page_id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<CreateListItemRequest>,
) -> Result<(StatusCode, Json<ListItemResponse>), AppError> {
    payload.validate()?;

    let item = state
        .list_service
        .add_item(
            page_id,
            CreateListItem {
                title: payload.title,
                target_url: payload.target_url,
                visible: payload.visible,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn update_item_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateListItemRequest>,
) -> Result<Json<ListItemResponse>, AppError> {
    payload.validate()?;

    let item = state.list_service.update_item(id, payload.into()).await?;
    Ok(Json(item.into()))
}

pub async fn delete_item_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.list_service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
