//! Host-facing seams: configuration, record feed and output sinks

pub mod config;
pub mod memory;
pub mod record;
pub mod sinks;

pub use config::{ViewerConfig, ViewerMessages};
pub use memory::{ChannelActionSink, MemoryClipboard, MemoryNotifier, TracingNotifier};
pub use record::{RecordFeed, RecordPublisher, RecordUpdate, SubjectId};
pub use sinks::{
    ActionSink, ClipboardError, ClipboardSink, InsightAction, Notification, NotificationSink,
    Severity,
};
