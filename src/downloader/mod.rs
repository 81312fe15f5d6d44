//! Batch downloader: drains an item source and downloads every item
//! concurrently, bounded by a slot limit.
//!
//! Split into focused submodules:
//! - [`traits`] - Collaborator seams (items, source, client pool, transfer engine, progress)
//! - [`source`] - Ready-made item sources
//! - [`write_at`] - Positional write targets and the progress-reporting sink
//! - `task` - Per-item lifecycle and outcome classification
//!
//! # Failure policy
//!
//! - A transfer error is a per-item failure: it reaches the progress sink as
//!   [`Outcome::Failed`] and the batch continues.
//! - A cancellation (from the caller, or returned by any transfer) cancels the
//!   whole batch: no further items are dequeued and in-flight transfers are
//!   dropped. [`Downloader::download`] then returns [`Error::Canceled`].
//! - An enumeration error from the item source is fatal. Items already started
//!   finish first, then [`Error::Enumeration`] is returned.

pub mod source;
mod task;
pub mod traits;
pub mod write_at;


use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::config::{DownloadConfig, validate_limit};
use crate::error::{Error, Result};
use crate::types::{BatchReport, Outcome};

pub use source::{IterSource, StreamSource};
pub use traits::{ClientPool, Item, ItemSource, Progress, TransferEngine, TransferRequest};
pub use write_at::WriteAt;

use task::TaskContext;

/// Everything a [`Downloader`] needs for one batch
pub struct Options<I: Item, C> {
    /// Endpoint to client mapping, shared by every task
    pub pool: Arc<dyn ClientPool<Client = C>>,
    /// Performs the chunked fetch of a single item
    pub engine: Arc<dyn TransferEngine<C, I::Location>>,
    /// Part size, per-item thread cap and default concurrency limit
    pub config: DownloadConfig,
    /// Items to download
    pub iter: Box<dyn ItemSource<Item = I>>,
    /// Lifecycle notifications
    pub progress: Arc<dyn Progress<I>>,
}

/// Concurrent batch downloader
///
/// A downloader runs a single batch; [`download`](Self::download) consumes it.
pub struct Downloader<I: Item, C> {
    opts: Options<I, C>,
}

impl<I, C> Downloader<I, C>
where
    I: Item,
    C: Send + Sync + 'static,
{
    /// Create a downloader for one batch
    pub fn new(opts: Options<I, C>) -> Self {
        Self { opts }
    }

    /// Download every item using the configured concurrency limit.
    ///
    /// A zero `config.limit` is rejected with [`Error::Config`].
    pub async fn run(self, cancel: CancellationToken) -> Result<BatchReport> {
        let limit = self.opts.config.limit;
        self.download(cancel, limit).await
    }

    /// Download every item from the source, at most `limit` at a time.
    ///
    /// Returns a report once the source is exhausted and every started item has
    /// finished, regardless of per-item failures. Cancelling `cancel` stops the
    /// batch; the caller's token itself is never cancelled by the downloader.
    pub async fn download(self, cancel: CancellationToken, limit: usize) -> Result<BatchReport> {
        validate_limit(limit)?;
        self.opts.config.validate_transfer()?;

        let Options {
            pool,
            engine,
            config,
            mut iter,
            progress,
        } = self.opts;

        let scope = cancel.child_token();
        let ctx = Arc::new(TaskContext {
            pool,
            engine,
            progress,
            part_size: config.part_size,
            threads: config.threads,
            scope: scope.clone(),
        });
        let slots = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();
        let mut report = BatchReport::default();

        tracing::debug!(
            limit,
            part_size = config.part_size,
            threads = config.threads,
            "Starting batch download"
        );

        let enumeration: Result<()> = loop {
            // Acquire a slot first so a dequeued item always gets a task
            let permit = tokio::select! {
                biased;
                _ = scope.cancelled() => break Ok(()),
                permit = Arc::clone(&slots).acquire_owned() => match permit {
                    Ok(p) => p,
                    // Never closed while the loop runs
                    Err(_) => break Ok(()),
                },
            };

            let item = tokio::select! {
                biased;
                _ = scope.cancelled() => break Ok(()),
                next = iter.next(&scope) => match next {
                    Ok(Some(item)) => item,
                    Ok(None) => break Ok(()),
                    Err(e) => {
                        if e.is_cancellation() {
                            scope.cancel();
                        }
                        break Err(e);
                    }
                },
            };

            let ctx = Arc::clone(&ctx);
            tasks.spawn(async move {
                let _permit = permit;
                ctx.run_item(item).await
            });

            // Reap finished tasks so the set does not grow with the batch
            while let Some(joined) = tasks.try_join_next() {
                record_joined(&mut report, joined);
            }
        };

        while let Some(joined) = tasks.join_next().await {
            record_joined(&mut report, joined);
        }

        // Enumeration failures win over task results; a cancelled source
        // already cancelled the scope above.
        if let Err(e) = enumeration
            && !e.is_cancellation()
        {
            tracing::error!(
                error = %e,
                started = report.started,
                "Item enumeration failed"
            );
            return Err(Error::Enumeration(Box::new(e)));
        }

        if scope.is_cancelled() {
            tracing::info!(
                started = report.started,
                succeeded = report.succeeded,
                failed = report.failed,
                canceled = report.canceled,
                "Batch download canceled"
            );
            return Err(Error::Canceled);
        }

        tracing::debug!(
            started = report.started,
            succeeded = report.succeeded,
            failed = report.failed,
            bytes = report.bytes,
            "Batch download finished"
        );
        Ok(report)
    }
}

fn record_joined(report: &mut BatchReport, joined: std::result::Result<Outcome, JoinError>) {
    match joined {
        Ok(outcome) => report.record(&outcome),
        Err(e) => {
            // Sink and transfer panics are caught inside the task
            tracing::error!(error = %e, "Download task panicked");
            report.record(&Outcome::Failed(Error::TaskPanicked(e.to_string())));
        }
    }
}
