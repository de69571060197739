//! Handlers for the analytics endpoints.
//!
//! All of them accept `days` (1..=365, default 30) and `limit` (1..=100,
//! default 10) where relevant; out-of-range values are a 400.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::analytics::{
    AnalyticsQuery, AnalyticsResponse, DailyClicksResponse, OverviewResponse,
    TopListItemResponse, TopShortLinkResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/analytics?days=&limit=`
///
/// Overview, daily series, and both leaderboards in one response.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let report = state
        .analytics_service
        .report(query.days(), query.limit())
        .await?;

    Ok(Json(report.into()))
}

/// `GET /api/analytics/overview`
pub async fn overview_handler(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    Ok(Json(state.analytics_service.overview().await?.into()))
}

/// `GET /api/analytics/clicks?days=`
pub async fn clicks_over_time_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<DailyClicksResponse>>, AppError> {
    let series = state
        .analytics_service
        .clicks_over_time(query.days())
        .await?;

    Ok(Json(series.into_iter().map(Into::into).collect()))
}

/// `GET /api/analytics/top-links?limit=`
pub async fn top_links_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<TopShortLinkResponse>>, AppError> {
    let top = state
        .analytics_service
        .top_short_links(query.limit())
        .await?;

    Ok(Json(top.into_iter().map(Into::into).collect()))
}

/// `GET /api/analytics/top-items?limit=`
pub async fn top_items_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Vec<TopListItemResponse>>, AppError> {
    let top = state.analytics_service.top_list_items(query.limit()).await?;

    Ok(Json(top.into_iter().map(Into::into).collect()))
}
