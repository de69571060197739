//! DTOs for short link management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::PaginationMeta;
use crate::domain::entities::{ShortLink, ShortLinkPatch};

/// Body of `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "targetUrl must be 1-2048 characters"))]
    pub target_url: String,

    #[validate(length(min = 3, max = 50, message = "alias must be 3-50 characters"))]
    pub alias: Option<String>,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub expires_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /api/links/{id}`.
///
/// For `description` and `expiresAt`: absent leaves the value, `null` clears it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "targetUrl must be 1-2048 characters"))]
    pub target_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    /// Replaces the tag set; `[]` clears it.
    pub tags: Option<Vec<String>>,

    pub active: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateLinkRequest> for ShortLinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        Self {
            target_url: req.target_url.map(|u| u.trim().to_string()),
            description: req.description,
            tags: req.tags,
            active: req.active,
            expires_at: req.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub id: i64,
    pub code: String,
    pub alias: Option<String>,
    pub short_url: String,
    pub target_url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLinkResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            alias: link.alias,
            short_url,
            target_url: link.target_url,
            description: link.description,
            tags: link.tags,
            active: link.active,
            expires_at: link.expires_at,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<ShortLinkResponse>,
    pub pagination: PaginationMeta,
}
