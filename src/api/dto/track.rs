use serde::Serialize;

/// Body returned by the tracking endpoint, whether or not a click was queued.
#[derive(Debug, Serialize)]
pub struct TrackClickResponse {
    pub success: bool,
}
