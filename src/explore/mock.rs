//! Scripted query service for tests and offline runs

use super::service::{QueryError, QueryService};
use crate::integration::record::SubjectId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// A question the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCall {
    pub subject_id: SubjectId,
    pub question: String,
}

/// Query service returning queued replies
///
/// Replies are consumed in order; once the queue is empty every call
/// answers with an empty string. A gated mock holds each request until
/// [`MockQueryService::release`] is called, which keeps a request in
/// flight for as long as a test needs.
#[derive(Debug, Default)]
pub struct MockQueryService {
    replies: Mutex<VecDeque<Result<String, QueryError>>>,
    calls: Mutex<Vec<QueryCall>>,
    gate: Option<Arc<Notify>>,
}

impl MockQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(reply.into()));
        self
    }

    pub fn with_error(self, err: QueryError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    /// Let one held request proceed
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<QueryCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn ask(&self, subject_id: &SubjectId, question: &str) -> Result<String, QueryError> {
        self.calls.lock().push(QueryCall {
            subject_id: subject_id.clone(),
            question: question.to_string(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
