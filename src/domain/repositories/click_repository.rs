//! Repository trait for click recording.

use crate::domain::click_event::ClickTarget;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Atomically increments the target's `click_count` and appends one click
    /// event at `occurred_at`, as a single unit.
    ///
    /// Returns `Ok(false)` without writing anything if the target does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_click(
        &self,
        target: ClickTarget,
        occurred_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;
}
