//! DTOs for the analytics endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::AnalyticsReport;
use crate::application::services::analytics_service::{DEFAULT_DAYS, DEFAULT_TOP_LIMIT};
use crate::domain::entities::{DailyClicks, Overview, TopListItem, TopShortLink};

/// `?days=&limit=`. Range checks happen in the service.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub days: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl AnalyticsQuery {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_DAYS)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_TOP_LIMIT)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_short_links: i64,
    pub active_short_links: i64,
    pub total_short_link_clicks: i64,
    pub total_list_pages: i64,
    pub total_list_items: i64,
    pub total_list_clicks: i64,
    pub total_clicks: i64,
}

impl From<Overview> for OverviewResponse {
    fn from(o: Overview) -> Self {
        Self {
            total_short_links: o.total_short_links,
            active_short_links: o.active_short_links,
            total_short_link_clicks: o.total_short_link_clicks,
            total_list_pages: o.total_list_pages,
            total_list_items: o.total_list_items,
            total_list_clicks: o.total_list_clicks,
            total_clicks: o.total_clicks,
        }
    }
}

/// One day of the series; `date` renders as `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
pub struct DailyClicksResponse {
    pub date: NaiveDate,
    pub count: i64,
}

impl From<DailyClicks> for DailyClicksResponse {
    fn from(d: DailyClicks) -> Self {
        Self {
            date: d.date,
            count: d.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopShortLinkResponse {
    pub id: i64,
    pub code: String,
    pub alias: Option<String>,
    /// Alias when set, otherwise the code.
    pub name: String,
    pub target_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TopShortLink> for TopShortLinkResponse {
    fn from(t: TopShortLink) -> Self {
        Self {
            name: t.alias.clone().unwrap_or_else(|| t.code.clone()),
            id: t.id,
            code: t.code,
            alias: t.alias,
            target_url: t.target_url,
            click_count: t.click_count,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopListItemResponse {
    pub id: i64,
    pub title: String,
    pub target_url: String,
    pub list_page_id: i64,
    pub list_title: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TopListItem> for TopListItemResponse {
    fn from(t: TopListItem) -> Self {
        Self {
            id: t.id,
            title: t.title,
            target_url: t.target_url,
            list_page_id: t.list_page_id,
            list_title: t.list_title,
            click_count: t.click_count,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub days: u32,
    pub overview: OverviewResponse,
    pub clicks_over_time: Vec<DailyClicksResponse>,
    pub top_short_links: Vec<TopShortLinkResponse>,
    pub top_list_items: Vec<TopListItemResponse>,
}

impl From<AnalyticsReport> for AnalyticsResponse {
    fn from(r: AnalyticsReport) -> Self {
        Self {
            days: r.days,
            overview: r.overview.into(),
            clicks_over_time: r.clicks_over_time.into_iter().map(Into::into).collect(),
            top_short_links: r.top_short_links.into_iter().map(Into::into).collect(),
            top_list_items: r.top_list_items.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_daily_clicks_date_format() {
        let value = serde_json::to_value(DailyClicksResponse {
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            count: 4,
        })
        .unwrap();
        assert_eq!(value, json!({ "date": "2026-03-09", "count": 4 }));
    }

    #[test]
    fn test_top_link_name_prefers_alias() {
        let top = TopShortLink {
            id: 1,
            code: "abc123".to_string(),
            alias: Some("docs".to_string()),
            target_url: "https://example.com".to_string(),
            click_count: 3,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(TopShortLinkResponse::from(top)).unwrap();
        assert_eq!(value["name"], "docs");
        assert_eq!(value["clickCount"], 3);
    }

    #[test]
    fn test_query_defaults() {
        let query = AnalyticsQuery::default();
        assert_eq!(query.days(), 30);
        assert_eq!(query.limit(), 10);
    }
}
