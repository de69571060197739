//! Read models produced by the analytics aggregation.

use chrono::{DateTime, NaiveDate, Utc};

/// Raw counters as stored. [`Overview`] derives the combined total from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverviewCounts {
    pub total_short_links: i64,
    pub active_short_links: i64,
    pub short_link_clicks: i64,
    pub list_pages: i64,
    pub list_items: i64,
    pub list_clicks: i64,
}

/// Summary totals over current entity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    pub total_short_links: i64,
    pub active_short_links: i64,
    pub total_short_link_clicks: i64,
    pub total_list_pages: i64,
    pub total_list_items: i64,
    pub total_list_clicks: i64,
    pub total_clicks: i64,
}

impl From<OverviewCounts> for Overview {
    fn from(c: OverviewCounts) -> Self {
        Self {
            total_short_links: c.total_short_links,
            active_short_links: c.active_short_links,
            total_short_link_clicks: c.short_link_clicks,
            total_list_pages: c.list_pages,
            total_list_items: c.list_items,
            total_list_clicks: c.list_clicks,
            total_clicks: c.short_link_clicks + c.list_clicks,
        }
    }
}

/// Click count for one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopShortLink {
    pub id: i64,
    pub code: String,
    pub alias: Option<String>,
    pub target_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopListItem {
    pub id: i64,
    pub title: String,
    pub target_url: String,
    pub list_page_id: i64,
    pub list_title: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Ranking key shared by both leaderboards: clicks descending, then oldest first.
pub trait Ranked {
    fn rank_key(&self) -> (i64, DateTime<Utc>, i64);
}

impl Ranked for TopShortLink {
    fn rank_key(&self) -> (i64, DateTime<Utc>, i64) {
        (self.click_count, self.created_at, self.id)
    }
}

impl Ranked for TopListItem {
    fn rank_key(&self) -> (i64, DateTime<Utc>, i64) {
        (self.click_count, self.created_at, self.id)
    }
}
