use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;

use crate::api::dto::track::TrackClickResponse;
use crate::domain::click_event::ClickTarget;
use crate::state::AppState;

/// `POST /api/track-click/{item_id}`
///
/// Always answers `{"success": true}`. A malformed id or a missing item is a
/// silent no-op; the worker skips targets that no longer exist.
pub async fn track_click_handler(
    Path(item_id): Path<String>,
    State(state): State<AppState>,
) -> Json<TrackClickResponse> {
    match item_id.parse::<i64>() {
        Ok(id) if id > 0 => {
            state.click_recorder.record(ClickTarget::ListItem(id));
        }
        _ => debug!(item_id = %item_id, "Ignoring click for malformed item id"),
    }

    Json(TrackClickResponse { success: true })
}
