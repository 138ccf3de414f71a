//! Output collaborators: notifications, clipboard, outbound action events
//!
//! These are fire-and-forget seams. The view model never waits on them and
//! never treats their failure as fatal.

use crate::analysis::AnalysisModel;
use crate::integration::record::SubjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast-style notification for the user
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            raised_at: Utc::now(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Error)
    }
}

/// Receives user-visible notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write denied: {0}")]
    Denied(String),
}

/// Receives text to copy to the system clipboard
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// User-initiated actions emitted to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum InsightAction {
    ScheduleMeeting {
        subject_id: SubjectId,
    },
    EnrollToEnablement {
        subject_id: SubjectId,
    },
    ExportInsights {
        subject_id: SubjectId,
        model: Option<AnalysisModel>,
    },
    RefreshAnalysis {
        subject_id: SubjectId,
    },
}

impl InsightAction {
    pub fn event_name(&self) -> &'static str {
        match self {
            InsightAction::ScheduleMeeting { .. } => "schedulemeeting",
            InsightAction::EnrollToEnablement { .. } => "enrolltoenablement",
            InsightAction::ExportInsights { .. } => "exportinsights",
            InsightAction::RefreshAnalysis { .. } => "refreshanalysis",
        }
    }

    pub fn subject_id(&self) -> &SubjectId {
        match self {
            InsightAction::ScheduleMeeting { subject_id }
            | InsightAction::EnrollToEnablement { subject_id }
            | InsightAction::ExportInsights { subject_id, .. }
            | InsightAction::RefreshAnalysis { subject_id } => subject_id,
        }
    }
}

/// Receives outbound action events
pub trait ActionSink: Send + Sync {
    fn emit(&self, action: InsightAction);
}
