use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{DailyClicksRow, OverviewRow, TopListItemRow, TopShortLinkRow};
use crate::domain::entities::{DailyClicks, OverviewCounts, TopListItem, TopShortLink};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn overview(&self) -> Result<OverviewCounts, AppError> {
        let row: OverviewRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM short_links)                                AS total_short_links,
                (SELECT COUNT(*) FROM short_links WHERE active)                   AS active_short_links,
                (SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM short_links)   AS short_link_clicks,
                (SELECT COUNT(*) FROM list_pages)                                 AS list_pages,
                (SELECT COUNT(*) FROM list_items)                                 AS list_items,
                (SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM list_items)    AS list_clicks
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn daily_clicks(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let rows: Vec<DailyClicksRow> = sqlx::query_as(
            r#"
            SELECT
                (occurred_at AT TIME ZONE 'UTC')::date AS day,
                COUNT(*)                               AS clicks
            FROM click_events
            WHERE occurred_at >= $1 AND occurred_at <= $2
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(DailyClicks::from).collect())
    }

    async fn top_short_links(&self, limit: i64) -> Result<Vec<TopShortLink>, AppError> {
        let rows: Vec<TopShortLinkRow> = sqlx::query_as(
            r#"
            SELECT id, code, alias, target_url, click_count, created_at
            FROM short_links
            ORDER BY click_count DESC, created_at ASC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(TopShortLink::from).collect())
    }

    async fn top_list_items(&self, limit: i64) -> Result<Vec<TopListItem>, AppError> {
        let rows: Vec<TopListItemRow> = sqlx::query_as(
            r#"
            SELECT
                i.id,
                i.title,
                i.target_url,
                i.list_page_id,
                p.title AS list_title,
                i.click_count,
                i.created_at
            FROM list_items i
            JOIN list_pages p ON p.id = i.list_page_id
            ORDER BY i.click_count DESC, i.created_at ASC, i.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(TopListItem::from).collect())
    }
}
