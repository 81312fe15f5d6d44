//! Provided progress sinks

use tokio::sync::broadcast;

use crate::downloader::{Item, Progress};
use crate::types::{Event, Outcome, ProgressState};

/// Progress sink that ignores every notification
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpProgress;

impl<I> Progress<I> for NoOpProgress {
    fn on_start(&self, _item: &I) {}

    fn on_finish(&self, _item: &I, _outcome: &Outcome) {}
}

/// Human-readable name for an item, used in events
pub trait ItemLabel {
    /// Label shown to event consumers (file name, message id, ...)
    fn label(&self) -> String;
}

/// Progress sink that publishes [`Event`]s on a broadcast channel
///
/// Sending never blocks; events are dropped when nobody is subscribed and
/// slow subscribers observe `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use batch_dl::progress::EventProgress;
///
/// let progress = EventProgress::new(64);
/// let mut events = progress.subscribe();
/// assert!(events.try_recv().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct EventProgress {
    event_tx: broadcast::Sender<Event>,
}

impl EventProgress {
    /// Create a sink whose channel buffers up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _rx) = broadcast::channel(capacity.max(1));
        Self { event_tx }
    }

    /// Subscribe to item events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}

impl<I: Item + ItemLabel> Progress<I> for EventProgress {
    fn on_start(&self, item: &I) {
        self.emit(Event::ItemStarted {
            item: item.label(),
            size: item.size(),
        });
    }

    fn on_progress(&self, item: &I, state: ProgressState) {
        self.emit(Event::ItemProgress {
            item: item.label(),
            downloaded: state.downloaded,
            total: state.total,
        });
    }

    fn on_finish(&self, item: &I, outcome: &Outcome) {
        self.emit(Event::ItemFinished {
            item: item.label(),
            outcome: outcome.kind(),
            error: outcome.error().map(ToString::to_string),
        });
    }
}
