//! DTOs for link-in-bio pages and items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::PaginationMeta;
use crate::domain::entities::{
    ListItem, ListItemPatch, ListPagePatch, ListPageSummary, ListPageWithItems,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListPageRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 3, max = 50, message = "slug must be 3-50 characters"))]
    pub slug: String,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Body of `PUT /api/lists/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListPageRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 3, max = 50, message = "slug must be 3-50 characters"))]
    pub slug: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateListPageRequest> for ListPagePatch {
    fn from(req: UpdateListPageRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListItemRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2048, message = "targetUrl must be 1-2048 characters"))]
    pub target_url: String,

    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListItemRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2048, message = "targetUrl must be 1-2048 characters"))]
    pub target_url: Option<String>,

    pub visible: Option<bool>,

    #[validate(range(min = 0, message = "order must not be negative"))]
    pub order: Option<i32>,
}

impl From<UpdateListItemRequest> for ListItemPatch {
    fn from(req: UpdateListItemRequest) -> Self {
        Self {
            title: req.title,
            target_url: req.target_url.map(|u| u.trim().to_string()),
            visible: req.visible,
            position: req.order,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemResponse {
    pub id: i64,
    pub list_page_id: i64,
    pub title: String,
    pub target_url: String,
    pub click_count: i64,
    pub visible: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ListItem> for ListItemResponse {
    fn from(item: ListItem) -> Self {
        Self {
            id: item.id,
            list_page_id: item.list_page_id,
            title: item.title,
            target_url: item.target_url,
            click_count: item.click_count,
            visible: item.visible,
            order: item.position,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPageResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ListItemResponse>,
}

impl From<ListPageWithItems> for ListPageResponse {
    fn from(value: ListPageWithItems) -> Self {
        let ListPageWithItems { page, items } = value;
        Self {
            id: page.id,
            title: page.title,
            slug: page.slug,
            description: page.description,
            created_at: page.created_at,
            items: items.into_iter().map(ListItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPageSummaryResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ListPageSummary> for ListPageSummaryResponse {
    fn from(summary: ListPageSummary) -> Self {
        let ListPageSummary { page, item_count } = summary;
        Self {
            id: page.id,
            title: page.title,
            slug: page.slug,
            description: page.description,
            item_count,
            created_at: page.created_at,
        }
    }
}

/// Response of `GET /api/lists`.
#[derive(Debug, Serialize)]
pub struct ListPageListResponse {
    pub lists: Vec<ListPageSummaryResponse>,
    pub pagination: PaginationMeta,
}
