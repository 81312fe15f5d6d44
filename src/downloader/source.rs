//! Ready-made [`ItemSource`] adapters.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::traits::{Item, ItemSource};

/// Source over an in-memory collection of items; never fails
pub struct IterSource<It> {
    items: It,
}

impl<It> IterSource<It>
where
    It: Iterator,
{
    /// Wrap anything iterable
    pub fn new(items: impl IntoIterator<IntoIter = It>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

#[async_trait]
impl<It> ItemSource for IterSource<It>
where
    It: Iterator + Send,
    It::Item: Item,
{
    type Item = It::Item;

    async fn next(&mut self, cancel: &CancellationToken) -> crate::Result<Option<Self::Item>> {
        if cancel.is_cancelled() {
            return Err(crate::Error::Canceled);
        }
        Ok(self.items.next())
    }
}

/// Source over a fallible async stream, e.g. a paginated remote listing
///
/// The first `Err` from the stream ends enumeration.
pub struct StreamSource<S> {
    stream: S,
}

impl<S> StreamSource<S> {
    /// Wrap a stream of items
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<S, I> ItemSource for StreamSource<S>
where
    S: Stream<Item = crate::Result<I>> + Send + Unpin,
    I: Item,
{
    type Item = I;

    async fn next(&mut self, cancel: &CancellationToken) -> crate::Result<Option<I>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(crate::Error::Canceled),
            item = self.stream.next() => item.transpose(),
        }
    }
}
