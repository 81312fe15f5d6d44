//! In-memory remote: a client pool and a chunked, parallel transfer engine
//! serving objects from a map.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use batch_dl::downloader::{ClientPool, TransferEngine, TransferRequest, WriteAt};
use batch_dl::{DcId, Error};

/// Client handle for one data center
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteClient {
    pub dc: DcId,
    pub takeout: bool,
}

/// Pool that hands out clients and remembers which ones were requested
#[derive(Default)]
pub struct RemotePool {
    pub requested: Mutex<Vec<RemoteClient>>,
}

#[async_trait]
impl ClientPool for RemotePool {
    type Client = RemoteClient;

    async fn client(&self, _cancel: &CancellationToken, dc: DcId) -> RemoteClient {
        let client = RemoteClient { dc, takeout: false };
        self.requested.lock().unwrap().push(client.clone());
        client
    }

    async fn takeout(&self, _cancel: &CancellationToken, dc: DcId) -> RemoteClient {
        let client = RemoteClient { dc, takeout: true };
        self.requested.lock().unwrap().push(client.clone());
        client
    }
}

/// Transfer engine splitting each object into `part_size` parts and writing
/// up to `threads` parts concurrently
#[derive(Default)]
pub struct MemoryEngine {
    objects: HashMap<String, Vec<u8>>,
    /// Highest number of parts of a single object written at once
    pub max_parts_in_flight: AtomicUsize,
}

impl MemoryEngine {
    pub fn new(objects: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            objects: objects.into_iter().collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl TransferEngine<RemoteClient, String> for MemoryEngine {
    async fn transfer(
        &self,
        request: &TransferRequest<'_, RemoteClient, String>,
        cancel: &CancellationToken,
        sink: &dyn WriteAt,
    ) -> batch_dl::Result<u64> {
        let data = self
            .objects
            .get(request.location)
            .ok_or_else(|| Error::Protocol(format!("{}: object not found", request.location)))?;

        let parts: Vec<(u64, &[u8])> = data
            .chunks(request.part_size)
            .enumerate()
            .map(|(i, chunk)| ((i * request.part_size) as u64, chunk))
            .collect();

        let in_flight = AtomicUsize::new(0);
        let in_flight = &in_flight;
        let parts: Vec<_> = parts
            .into_iter()
            .map(|(offset, chunk)| async move {
                if cancel.is_cancelled() {
                    return Err(Error::Canceled);
                }
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_parts_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                let result = sink.write_at(chunk, offset).map_err(Error::from);
                in_flight.fetch_sub(1, Ordering::SeqCst);
                result
            })
            .collect();
        let written: Vec<batch_dl::Result<usize>> = stream::iter(parts)
            .buffer_unordered(request.threads)
            .collect()
            .await;

        let mut total = 0u64;
        for part in written {
            total += part? as u64;
        }
        Ok(total)
    }
}
