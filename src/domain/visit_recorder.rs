//! Visit recording for resolved redirects.
//!
//! Each visit is written on its own spawned task and the caller awaits it, so
//! the counter is current once a redirect is answered while a dropped request
//! future (client disconnect) cannot cancel a write that already started.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error};

use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;
/// Base of the exponential backoff, in milliseconds.
const RETRY_BASE_MS: u64 = 10;
const RETRY_MAX_DELAY: Duration = Duration::from_millis(200);

/// Applies visits to the store and tracks writes still in flight.
///
/// Every write holds a read guard on `in_flight`; [`Self::wait_idle`] takes
/// the write side, which only succeeds once no write is running.
pub struct VisitRecorder {
    repository: Arc<dyn LinkRepository>,
    in_flight: Arc<RwLock<()>>,
}

impl VisitRecorder {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self {
            repository,
            in_flight: Arc::new(RwLock::new(())),
        }
    }

    /// Records one visit and waits for the outcome.
    ///
    /// Returns true if the visit was counted. Storage failures and task
    /// panics are logged and reported as `false`, never as an error.
    pub async fn record(&self, event: VisitEvent) -> bool {
        let guard = self.in_flight.clone().read_owned().await;
        let repository = self.repository.clone();
        let code = event.code.clone();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            record_with_retry(repository.as_ref(), &event, default_backoff()).await
        });

        match handle.await {
            Ok(recorded) => recorded,
            Err(e) => {
                error!(code = %code, error = %e, "Visit task failed");
                false
            }
        }
    }

    /// Waits until every visit write started so far has finished.
    pub async fn wait_idle(&self) {
        let _idle = self.in_flight.write().await;
    }
}

fn default_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_BASE_MS)
        .max_delay(RETRY_MAX_DELAY)
        .map(jitter)
        .take(MAX_RETRIES)
}

/// Applies one visit, retrying transient storage failures along `backoff`.
///
/// Returns true if the visit was counted. Failures are logged and swallowed.
pub(crate) async fn record_with_retry<R, I>(repository: &R, event: &VisitEvent, backoff: I) -> bool
where
    R: LinkRepository + ?Sized,
    I: IntoIterator<Item = Duration>,
{
    let result = RetryIf::start(
        backoff,
        || repository.record_visit(&event.code, event.visited_at),
        |e: &AppError| e.is_transient(),
    )
    .await;

    match result {
        Ok(true) => {
            debug!(code = %event.code, "Visit recorded");
            true
        }
        Ok(false) => {
            debug!(code = %event.code, "Visit for missing link ignored");
            false
        }
        Err(e) => {
            error!(code = %event.code, error = %e, "Failed to record visit");
            false
        }
    }
}
