//! Per-item task: client resolution, transfer, outcome classification.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::threads::best_threads;
use crate::types::Outcome;

use super::traits::{ClientPool, Item, Progress, TransferEngine, TransferRequest};
use super::write_at::ProgressWriter;

/// State shared by every task of one batch
pub(super) struct TaskContext<I: Item, C> {
    pub(super) pool: Arc<dyn ClientPool<Client = C>>,
    pub(super) engine: Arc<dyn TransferEngine<C, I::Location>>,
    pub(super) progress: Arc<dyn Progress<I>>,
    pub(super) part_size: usize,
    pub(super) threads: usize,
    /// Batch-wide scope; cancelling it stops enumeration and every task
    pub(super) scope: CancellationToken,
}

impl<I, C> TaskContext<I, C>
where
    I: Item,
    C: Send + Sync + 'static,
{
    /// Run one item through its whole lifecycle.
    ///
    /// `on_start` and `on_finish` are always delivered as a pair, whatever the
    /// transfer or the sink does. A cancellation outcome also cancels the batch
    /// scope.
    pub(super) async fn run_item(&self, item: I) -> Outcome {
        let outcome = match notify(|| self.progress.on_start(&item)) {
            Ok(()) => self.classify(&item, self.download(&item).await),
            Err(message) => {
                tracing::error!(
                    dc = %item.dc(),
                    error = %message,
                    "Progress sink panicked on start, skipping item"
                );
                Outcome::Failed(Error::TaskPanicked(message))
            }
        };

        if let Err(message) = notify(|| self.progress.on_finish(&item, &outcome)) {
            tracing::error!(dc = %item.dc(), error = %message, "Progress sink panicked on finish");
        }
        outcome
    }

    fn classify(&self, item: &I, result: Result<u64>) -> Outcome {
        match result {
            Ok(bytes) => Outcome::Success { bytes },
            Err(e) if e.is_cancellation() => {
                self.scope.cancel();
                Outcome::Canceled
            }
            Err(e) => {
                // Soft failure: reported to the progress sink, batch continues
                tracing::warn!(
                    dc = %item.dc(),
                    size = item.size(),
                    error = %e,
                    "Item download failed, skipping"
                );
                Outcome::Failed(e)
            }
        }
    }

    async fn download(&self, item: &I) -> Result<u64> {
        if self.scope.is_cancelled() {
            return Err(Error::Canceled);
        }

        let threads = best_threads(item.size(), self.threads);
        tracing::debug!(
            dc = %item.dc(),
            size = item.size(),
            threads,
            takeout = item.as_takeout(),
            "Start download item"
        );

        let client = if item.as_takeout() {
            self.pool.takeout(&self.scope, item.dc()).await
        } else {
            self.pool.client(&self.scope, item.dc()).await
        };

        let request = TransferRequest {
            client: &client,
            location: item.location(),
            part_size: self.part_size,
            threads,
            size: item.size(),
        };
        let sink = ProgressWriter::new(item, self.progress.as_ref());
        let transfer = AssertUnwindSafe(self.engine.transfer(&request, &self.scope, &sink))
            .catch_unwind();

        tokio::select! {
            biased;
            _ = self.scope.cancelled() => Err(Error::Canceled),
            result = transfer => match result {
                Ok(result) => result,
                Err(panic) => Err(Error::TaskPanicked(panic_message(panic.as_ref()))),
            },
        }
    }
}

/// Run a progress sink callback, turning a panic into its message
fn notify(callback: impl FnOnce()) -> std::result::Result<(), String> {
    std::panic::catch_unwind(AssertUnwindSafe(callback))
        .map_err(|panic| panic_message(panic.as_ref()))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
