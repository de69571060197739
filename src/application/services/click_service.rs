//! Click recording: the fire-and-forget front and the persistence write behind it.

use std::sync::Arc;

use crate::domain::click_event::{ClickEvent, ClickTarget};
use crate::domain::clock::Clock;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Persists clicks through a [`ClickRepository`].
pub struct ClickService<C: ClickRepository + ?Sized> {
    repository: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C: ClickRepository + ?Sized> ClickService<C> {
    pub fn new(repository: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Records a click against `target` at the current instant.
    ///
    /// A target that no longer exists is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failures.
    pub async fn record_click(&self, target: ClickTarget) -> Result<(), AppError> {
        self.record_event(&ClickEvent::new(target, self.clock.now()))
            .await
    }

    /// Records a click that was accepted earlier, keeping its original timestamp.
    pub async fn record_event(&self, event: &ClickEvent) -> Result<(), AppError> {
        let recorded = self
            .repository
            .record_click(event.target, event.occurred_at)
            .await?;

        if recorded {
            metrics::counter!("clicks_recorded_total", "kind" => event.target.kind().as_str())
                .increment(1);
        } else {
            debug!(
                kind = %event.target.kind(),
                id = event.target.id(),
                "Click target vanished, skipping"
            );
        }

        Ok(())
    }
}

/// Non-blocking entry point used on the request path.
///
/// Hands events to the background worker through a bounded channel. When the
/// queue is full the click is dropped rather than delaying the response.
#[derive(Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
    clock: Arc<dyn Clock>,
}

impl ClickRecorder {
    pub fn new(sender: mpsc::Sender<ClickEvent>, clock: Arc<dyn Clock>) -> Self {
        Self { sender, clock }
    }

    /// Queues a click for `target`. Returns `false` if it was dropped.
    pub fn record(&self, target: ClickTarget) -> bool {
        let event = ClickEvent::new(target, self.clock.now());

        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("clicks_enqueued_total").increment(1);
                true
            }
            Err(TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!(
                    kind = %event.target.kind(),
                    id = event.target.id(),
                    "Click queue full, dropping click"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!("Click queue closed, dropping click");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}
