//! Repository trait for analytics reads.

use crate::domain::entities::{DailyClicks, OverviewCounts, TopListItem, TopShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only aggregation queries over click counters and click events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - in-process implementation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn overview(&self) -> Result<OverviewCounts, AppError>;

    /// Click events with `from <= occurred_at <= to`, grouped by UTC day.
    ///
    /// Only days with at least one event are returned, ascending by date.
    async fn daily_clicks(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError>;

    /// Up to `limit` links by `click_count` descending, ties by `created_at` ascending.
    async fn top_short_links(&self, limit: i64) -> Result<Vec<TopShortLink>, AppError>;

    /// Up to `limit` items by `click_count` descending, ties by `created_at` ascending,
    /// each with its page title.
    async fn top_list_items(&self, limit: i64) -> Result<Vec<TopListItem>, AppError>;
}
