//! Link-in-bio list pages and their items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A public link-in-bio page. Owns its [`ListItem`]s; deleting the page deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewListPage {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Partial update for a page. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPagePatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
}

/// A page as shown in the admin listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPageSummary {
    pub page: ListPage,
    pub item_count: i64,
}

/// One entry on a [`ListPage`]. `position` orders items for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: i64,
    pub list_page_id: i64,
    pub title: String,
    pub target_url: String,
    pub click_count: i64,
    pub visible: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for a new item. The repository appends it after the page's last item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListItem {
    pub list_page_id: i64,
    pub title: String,
    pub target_url: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItemPatch {
    pub title: Option<String>,
    pub target_url: Option<String>,
    pub visible: Option<bool>,
    pub position: Option<i32>,
}

/// A page together with its items in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPageWithItems {
    pub page: ListPage,
    pub items: Vec<ListItem>,
}
