//! Background worker that persists queued clicks.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, info, warn};

/// Retries after the first failed write.
const MAX_RETRIES: usize = 3;
const RETRY_BASE_MS: u64 = 50;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);

/// Drains the click channel until every sender is dropped.
///
/// Up to `concurrency` writes run at once. Each write is retried with
/// exponential backoff on transient errors. When the channel closes the worker
/// finishes the writes already in flight, then returns.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    service: Arc<ClickService<dyn ClickRepository>>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let service = service.clone();

        tasks.spawn(async move {
            persist_with_retry(&service, event).await;
            drop(permit);
        });

        while tasks.try_join_next().is_some() {}
    }

    let in_flight = tasks.len();
    if in_flight > 0 {
        info!(in_flight, "Click queue closed, finishing pending writes");
    }
    while tasks.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn persist_with_retry(service: &ClickService<dyn ClickRepository>, event: ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(RETRY_BASE_MS / 2)
        .max_delay(RETRY_MAX_DELAY)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        || service.record_event(&event),
        |e: &AppError| {
            let retry = e.is_retryable();
            if retry {
                warn!(error = %e, "Click write failed, retrying");
            }
            retry
        },
    )
    .await;

    if let Err(e) = result {
        metrics::counter!("clicks_failed_total").increment(1);
        error!(
            kind = %event.target.kind(),
            id = event.target.id(),
            error = %e,
            "Failed to record click"
        );
    }
}
