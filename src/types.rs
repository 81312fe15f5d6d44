//! Core types and events

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier of the remote endpoint (data center) an item lives on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DcId(pub i32);

impl std::fmt::Display for DcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-item result, delivered exactly once to [`Progress::on_finish`](crate::downloader::Progress::on_finish)
#[derive(Debug)]
pub enum Outcome {
    /// Item transferred completely
    Success {
        /// Bytes reported by the transfer engine
        bytes: u64,
    },
    /// Transfer failed; the batch keeps going
    Failed(Error),
    /// Item was cancelled before or during its transfer
    Canceled,
}

impl Outcome {
    /// Whether the item was transferred successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Fieldless form of this outcome
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success { .. } => OutcomeKind::Success,
            Outcome::Failed(_) => OutcomeKind::Failed,
            Outcome::Canceled => OutcomeKind::Canceled,
        }
    }

    /// The error that failed this item, if it failed
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Fieldless outcome, used in events and reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Item transferred completely
    Success,
    /// Transfer failed
    Failed,
    /// Item was cancelled
    Canceled,
}

/// Byte progress of one item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Bytes written to the item's target so far
    pub downloaded: u64,
    /// Declared item size in bytes
    pub total: u64,
}

/// Aggregate counts for a completed batch
///
/// `started` always equals `succeeded + failed + canceled`.
#[must_use]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Items dequeued from the source and handed to a task
    pub started: usize,
    /// Items that transferred successfully
    pub succeeded: usize,
    /// Items whose transfer failed (already reported through the progress sink)
    pub failed: usize,
    /// Items that were cancelled
    pub canceled: usize,
    /// Total bytes reported by successful transfers
    pub bytes: u64,
}

impl BatchReport {
    pub(crate) fn record(&mut self, outcome: &Outcome) {
        self.started += 1;
        match outcome {
            Outcome::Success { bytes } => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Canceled => self.canceled += 1,
        }
    }
}

/// Item lifecycle events emitted by [`EventProgress`](crate::progress::EventProgress)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Item transfer is starting
    ItemStarted {
        /// Item label
        item: String,
        /// Declared size in bytes
        size: u64,
    },

    /// Bytes were written to the item's target
    ItemProgress {
        /// Item label
        item: String,
        /// Bytes written so far
        downloaded: u64,
        /// Declared size in bytes
        total: u64,
    },

    /// Item finished, successfully or not
    ItemFinished {
        /// Item label
        item: String,
        /// How the item ended
        outcome: OutcomeKind,
        /// Error message when the transfer failed
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}
