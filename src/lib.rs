//! # batch-dl
//!
//! Concurrent batch download orchestrator.
//!
//! Given a source of downloadable items, batch-dl downloads them concurrently with a
//! bounded number of items in flight, picks a per-item thread count from the item's
//! size, reports each item's lifecycle to a progress sink, and separates fatal
//! cancellation from per-item failures that are reported and skipped.
//!
//! The byte-level transfer, client pooling and the concrete item type are supplied
//! by the caller through the traits in [`downloader`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use batch_dl::downloader::{Downloader, IterSource, Options};
//! use batch_dl::progress::NoOpProgress;
//! use batch_dl::DownloadConfig;
//! # use batch_dl::downloader::{ClientPool, Item, TransferEngine, TransferRequest, WriteAt};
//! # use batch_dl::DcId;
//! # use tokio_util::sync::CancellationToken;
//! # struct File { data: std::sync::Mutex<Vec<u8>> }
//! # impl Item for File {
//! #     type Location = String;
//! #     fn size(&self) -> u64 { 0 }
//! #     fn location(&self) -> &String { unimplemented!() }
//! #     fn dc(&self) -> DcId { DcId(1) }
//! #     fn target(&self) -> &dyn WriteAt { &self.data }
//! # }
//! # struct Pool;
//! # #[async_trait::async_trait]
//! # impl ClientPool for Pool {
//! #     type Client = ();
//! #     async fn client(&self, _cancel: &CancellationToken, _dc: DcId) -> () {}
//! #     async fn takeout(&self, _cancel: &CancellationToken, _dc: DcId) -> () {}
//! # }
//! # struct Engine;
//! # #[async_trait::async_trait]
//! # impl TransferEngine<(), String> for Engine {
//! #     async fn transfer(
//! #         &self,
//! #         _request: &TransferRequest<'_, (), String>,
//! #         _cancel: &CancellationToken,
//! #         _sink: &dyn WriteAt,
//! #     ) -> batch_dl::Result<u64> {
//! #         Ok(0)
//! #     }
//! # }
//!
//! # async fn example(files: Vec<File>) -> batch_dl::Result<()> {
//! let downloader = Downloader::new(Options {
//!     pool: Arc::new(Pool),
//!     engine: Arc::new(Engine),
//!     config: DownloadConfig::default(),
//!     iter: Box::new(IterSource::new(files)),
//!     progress: Arc::new(NoOpProgress),
//! });
//!
//! let report = downloader.download(CancellationToken::new(), 4).await?;
//! println!("{} downloaded, {} failed", report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Batch downloader and its collaborator traits
pub mod downloader;
/// Error types
pub mod error;
/// Provided progress sinks
pub mod progress;
/// Per-item thread count heuristic
pub mod threads;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::DownloadConfig;
pub use downloader::{Downloader, Options};
pub use error::{Error, Result};
pub use threads::best_threads;
pub use types::{BatchReport, DcId, Event, Outcome, OutcomeKind, ProgressState};
