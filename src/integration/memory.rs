//! In-process sink implementations
//!
//! Used by the binary and by tests in place of a real host.

use super::sinks::{
    ActionSink, ClipboardError, ClipboardSink, InsightAction, Notification, NotificationSink,
    Severity,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Keeps every notification it receives
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_all(&self) -> Vec<Notification> {
        self.notifications.read().clone()
    }

    pub fn len(&self) -> usize {
        self.notifications.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.read().is_empty()
    }

    pub fn clear(&self) {
        self.notifications.write().clear();
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.write().push(notification);
    }
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Error => error!(title = %n.title, "{}", n.message),
            Severity::Warning => warn!(title = %n.title, "{}", n.message),
            Severity::Info | Severity::Success => info!(title = %n.title, "{}", n.message),
        }
    }
}

/// Clipboard stand-in holding the last copied text
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<ClipboardError>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `err`
    pub fn fail_with(&self, err: ClipboardError) {
        *self.failure.lock() = Some(err);
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// Forwards action events over a channel to the host
#[derive(Debug, Clone)]
pub struct ChannelActionSink {
    tx: Sender<InsightAction>,
}

impl ChannelActionSink {
    pub fn new() -> (Self, Receiver<InsightAction>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl ActionSink for ChannelActionSink {
    fn emit(&self, action: InsightAction) {
        if self.tx.send(action).is_err() {
            warn!("Action receiver dropped, event discarded");
        }
    }
}
