//! Click analytics: summary totals, daily series, and leaderboards.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::entities::{DailyClicks, Overview, Ranked, TopListItem, TopShortLink};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;
use chrono::{Duration, NaiveDate};
use serde_json::json;

pub const DEFAULT_DAYS: u32 = 30;
pub const MAX_DAYS: u32 = 365;
pub const DEFAULT_TOP_LIMIT: u32 = 10;
pub const MAX_TOP_LIMIT: u32 = 100;

/// Everything the dashboard needs in one read.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub days: u32,
    pub overview: Overview,
    pub clicks_over_time: Vec<DailyClicks>,
    pub top_short_links: Vec<TopShortLink>,
    pub top_list_items: Vec<TopListItem>,
}

pub struct AnalyticsService<A: AnalyticsRepository + ?Sized> {
    repository: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A: AnalyticsRepository + ?Sized> AnalyticsService<A> {
    pub fn new(repository: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn overview(&self) -> Result<Overview, AppError> {
        Ok(self.repository.overview().await?.into())
    }

    /// Daily click counts for the UTC days covering `[now - days, now]`.
    ///
    /// Every day in the range is present, zero-filled, ascending, without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `days` is outside 1..=365.
    pub async fn clicks_over_time(&self, days: u32) -> Result<Vec<DailyClicks>, AppError> {
        validate_days(days)?;

        let to = self.clock.now();
        let from = to - Duration::days(i64::from(days));

        let rows = self.repository.daily_clicks(from, to).await?;

        Ok(fill_days(from.date_naive(), to.date_naive(), rows))
    }

    /// Up to `limit` short links by lifetime clicks.
    pub async fn top_short_links(&self, limit: u32) -> Result<Vec<TopShortLink>, AppError> {
        validate_limit(limit)?;
        let rows = self.repository.top_short_links(i64::from(limit)).await?;
        Ok(rank(rows, limit))
    }

    /// Up to `limit` list items by lifetime clicks, each with its page title.
    pub async fn top_list_items(&self, limit: u32) -> Result<Vec<TopListItem>, AppError> {
        validate_limit(limit)?;
        let rows = self.repository.top_list_items(i64::from(limit)).await?;
        Ok(rank(rows, limit))
    }

    /// Runs all four reads concurrently.
    pub async fn report(&self, days: u32, limit: u32) -> Result<AnalyticsReport, AppError> {
        let (overview, clicks_over_time, top_short_links, top_list_items) = tokio::try_join!(
            self.overview(),
            self.clicks_over_time(days),
            self.top_short_links(limit),
            self.top_list_items(limit),
        )?;

        Ok(AnalyticsReport {
            days,
            overview,
            clicks_over_time,
            top_short_links,
            top_list_items,
        })
    }
}

pub fn validate_days(days: u32) -> Result<(), AppError> {
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(AppError::bad_request(
            format!("days must be between 1 and {MAX_DAYS}"),
            json!({ "field": "days", "value": days }),
        ));
    }
    Ok(())
}

pub fn validate_limit(limit: u32) -> Result<(), AppError> {
    if !(1..=MAX_TOP_LIMIT).contains(&limit) {
        return Err(AppError::bad_request(
            format!("limit must be between 1 and {MAX_TOP_LIMIT}"),
            json!({ "field": "limit", "value": limit }),
        ));
    }
    Ok(())
}

/// Merges rows into a dense ascending series from `first` to `last` inclusive.
/// Rows outside the range are ignored; repeated dates are summed.
fn fill_days(first: NaiveDate, last: NaiveDate, rows: Vec<DailyClicks>) -> Vec<DailyClicks> {
    let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.date).or_default() += row.count;
    }

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| DailyClicks {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Clicks descending, then oldest first, then lowest id.
fn rank<T: Ranked>(mut rows: Vec<T>, limit: u32) -> Vec<T> {
    rows.sort_by(|a, b| {
        let (a_clicks, a_created, a_id) = a.rank_key();
        let (b_clicks, b_created, b_id) = b.rank_key();
        b_clicks
            .cmp(&a_clicks)
            .then(a_created.cmp(&b_created))
            .then(a_id.cmp(&b_id))
    });
    rows.truncate(limit as usize);
    rows
}
