//! Row types decoded by the PostgreSQL repositories.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::FromRow;

use crate::domain::entities::{
    DailyClicks, ListItem, ListPage, ListPageSummary, OverviewCounts, ShortLink, TopListItem,
    TopShortLink,
};
use crate::error::AppError;

pub(crate) const SHORT_LINK_COLUMNS: &str =
    "id, code, alias, target_url, description, tags, active, expires_at, click_count, created_at";

pub(crate) const LIST_PAGE_COLUMNS: &str = "id, title, slug, description, created_at";

pub(crate) const LIST_ITEM_COLUMNS: &str =
    "id, list_page_id, title, target_url, click_count, visible, position, created_at";

#[derive(FromRow)]
pub(crate) struct ShortLinkRow {
    id: i64,
    code: String,
    alias: Option<String>,
    target_url: String,
    description: Option<String>,
    tags: Vec<String>,
    active: bool,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(r: ShortLinkRow) -> Self {
        Self {
            id: r.id,
            code: r.code,
            alias: r.alias,
            target_url: r.target_url,
            description: r.description,
            tags: r.tags,
            active: r.active,
            expires_at: r.expires_at,
            click_count: r.click_count,
            created_at: r.created_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct ListPageRow {
    id: i64,
    title: String,
    slug: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ListPageRow> for ListPage {
    fn from(r: ListPageRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            slug: r.slug,
            description: r.description,
            created_at: r.created_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct ListPageSummaryRow {
    #[sqlx(flatten)]
    page: ListPageRow,
    item_count: i64,
}

impl From<ListPageSummaryRow> for ListPageSummary {
    fn from(r: ListPageSummaryRow) -> Self {
        Self {
            page: r.page.into(),
            item_count: r.item_count,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct ListItemRow {
    id: i64,
    list_page_id: i64,
    title: String,
    target_url: String,
    click_count: i64,
    visible: bool,
    position: i32,
    created_at: DateTime<Utc>,
}

impl From<ListItemRow> for ListItem {
    fn from(r: ListItemRow) -> Self {
        Self {
            id: r.id,
            list_page_id: r.list_page_id,
            title: r.title,
            target_url: r.target_url,
            click_count: r.click_count,
            visible: r.visible,
            position: r.position,
            created_at: r.created_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct OverviewRow {
    total_short_links: i64,
    active_short_links: i64,
    short_link_clicks: i64,
    list_pages: i64,
    list_items: i64,
    list_clicks: i64,
}

impl From<OverviewRow> for OverviewCounts {
    fn from(r: OverviewRow) -> Self {
        Self {
            total_short_links: r.total_short_links,
            active_short_links: r.active_short_links,
            short_link_clicks: r.short_link_clicks,
            list_pages: r.list_pages,
            list_items: r.list_items,
            list_clicks: r.list_clicks,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct DailyClicksRow {
    day: NaiveDate,
    clicks: i64,
}

impl From<DailyClicksRow> for DailyClicks {
    fn from(r: DailyClicksRow) -> Self {
        Self {
            date: r.day,
            count: r.clicks,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct TopShortLinkRow {
    id: i64,
    code: String,
    alias: Option<String>,
    target_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<TopShortLinkRow> for TopShortLink {
    fn from(r: TopShortLinkRow) -> Self {
        Self {
            id: r.id,
            code: r.code,
            alias: r.alias,
            target_url: r.target_url,
            click_count: r.click_count,
            created_at: r.created_at,
        }
    }
}

#[derive(FromRow)]
pub(crate) struct TopListItemRow {
    id: i64,
    title: String,
    target_url: String,
    list_page_id: i64,
    list_title: String,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<TopListItemRow> for TopListItem {
    fn from(r: TopListItemRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            target_url: r.target_url,
            list_page_id: r.list_page_id,
            list_title: r.list_title,
            click_count: r.click_count,
            created_at: r.created_at,
        }
    }
}

/// Maps a unique violation on a name column to a field-tagged conflict.
pub(crate) fn name_conflict(e: sqlx::Error, field: &'static str, name: &str) -> AppError {
    let is_unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if is_unique {
        AppError::conflict(
            format!("{} is already taken", capitalize(field)),
            json!({ "field": field, "name": name }),
        )
    } else {
        e.into()
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
