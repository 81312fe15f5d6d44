//! Collaborator seams for the downloader: items, their source, client pool,
//! transfer engine and progress sink.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::{DcId, Outcome, ProgressState};

use super::write_at::WriteAt;

/// One downloadable remote object
///
/// Immutable from the downloader's point of view. Items are moved into their
/// task, so they must be `'static`.
pub trait Item: Send + Sync + 'static {
    /// Remote location descriptor understood by the transfer engine
    type Location: Send + Sync;

    /// Declared size in bytes
    fn size(&self) -> u64;

    /// Where the content lives on the remote side
    fn location(&self) -> &Self::Location;

    /// Endpoint the item must be fetched from
    fn dc(&self) -> DcId;

    /// Whether the item has to be fetched through the takeout client
    fn as_takeout(&self) -> bool {
        false
    }

    /// Destination for the item's bytes
    fn target(&self) -> &dyn WriteAt;
}

/// Lazy, finite, non-restartable sequence of items
///
/// Polled from a single coordinating loop only.
#[async_trait]
pub trait ItemSource: Send {
    /// Item type produced by this source
    type Item: Item;

    /// Next item, `Ok(None)` once exhausted, or the error that ended enumeration.
    ///
    /// Must not be called again after it returned `Ok(None)` or an error.
    async fn next(&mut self, cancel: &CancellationToken) -> crate::Result<Option<Self::Item>>;
}

/// Maps an endpoint to a client handle
///
/// Shared read-only across every task.
#[async_trait]
pub trait ClientPool: Send + Sync {
    /// Client handle passed to the transfer engine
    type Client: Send + Sync;

    /// Regular client for `dc`
    async fn client(&self, cancel: &CancellationToken, dc: DcId) -> Self::Client;

    /// Takeout-mode client for `dc`
    async fn takeout(&self, cancel: &CancellationToken, dc: DcId) -> Self::Client;
}

/// Everything the transfer engine needs to fetch one item
#[derive(Debug)]
pub struct TransferRequest<'a, C, L> {
    /// Resolved client for the item's endpoint
    pub client: &'a C,
    /// Remote location of the item
    pub location: &'a L,
    /// Chunk size in bytes
    pub part_size: usize,
    /// Parallel part requests to use for this item
    pub threads: usize,
    /// Declared item size in bytes
    pub size: u64,
}

/// Chunked, parallel fetch of a single item
///
/// Writes every received chunk to `sink` at its offset and returns the number
/// of bytes transferred. Retries for transient faults belong here, not in the
/// downloader. Cancellation should be reported as [`Error::Canceled`](crate::Error::Canceled)
/// (possibly wrapped).
#[async_trait]
pub trait TransferEngine<C, L>: Send + Sync {
    /// Fetch one item
    async fn transfer(
        &self,
        request: &TransferRequest<'_, C, L>,
        cancel: &CancellationToken,
        sink: &dyn WriteAt,
    ) -> crate::Result<u64>;
}

/// Receives item lifecycle notifications
///
/// Called concurrently from every task. For each item `on_start` happens
/// before any `on_progress`, and `on_finish` is called exactly once, last.
pub trait Progress<I>: Send + Sync {
    /// Item is about to be transferred
    fn on_start(&self, item: &I);

    /// Bytes were written to the item's target
    fn on_progress(&self, _item: &I, _state: ProgressState) {}

    /// Item is done
    fn on_finish(&self, item: &I, outcome: &Outcome);
}
