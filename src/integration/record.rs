//! Record source plumbing
//!
//! The record source pushes the subject id and raw analysis whenever the
//! underlying call record changes. Only the most recent update matters, so
//! consumers drain the feed and keep the last one.

use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the call record being analyzed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A change notification from the record source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub subject_id: SubjectId,
    pub raw_analysis: String,
}

impl RecordUpdate {
    pub fn new(subject_id: impl Into<SubjectId>, raw_analysis: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            raw_analysis: raw_analysis.into(),
        }
    }
}

/// Channel pair carrying record updates to the view model
pub struct RecordFeed {
    tx: Sender<RecordUpdate>,
    rx: Receiver<RecordUpdate>,
}

impl Default for RecordFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordFeed {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Sender handed to the record source
    pub fn publisher(&self) -> RecordPublisher {
        RecordPublisher {
            tx: self.tx.clone(),
        }
    }

    /// Drain pending updates, returning only the newest
    pub fn latest(&self) -> Option<RecordUpdate> {
        self.rx.try_iter().last()
    }
}

/// Publishing half of a [`RecordFeed`]
#[derive(Clone)]
pub struct RecordPublisher {
    tx: Sender<RecordUpdate>,
}

impl RecordPublisher {
    /// Returns false once the feed has been dropped
    pub fn publish(&self, update: RecordUpdate) -> bool {
        match self.tx.try_send(update) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}
