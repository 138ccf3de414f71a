//! Explore-conversation session state
//!
//! One session covers one opening of the question dialog. Submitting a
//! question is split in two so the owner stays responsive while the query
//! is in flight:
//!
//! 1. [`ExploreSession::begin_submit`] validates, moves to `Awaiting` and
//!    hands back a [`PendingQuery`].
//! 2. [`PendingQuery::execute`] calls the query service.
//! 3. [`ExploreSession::complete`] applies the outcome, but only if its
//!    ticket still matches the live session and request.
//!
//! Closing the session does not cancel the call; the late outcome simply
//! fails the ticket check.

use super::service::{QueryError, QueryService};
use crate::integration::config::ViewerMessages;
use crate::integration::record::SubjectId;
use crate::integration::sinks::{Notification, NotificationSink};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Lifecycle of a question
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplorePhase {
    /// No question submitted yet
    #[default]
    Idle,
    /// Query in flight
    Awaiting,
    /// Answer received
    Answered,
    /// Query failed
    Failed,
}

impl ExplorePhase {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, ExplorePhase::Awaiting)
    }
}

impl fmt::Display for ExplorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorePhase::Idle => write!(f, "Idle"),
            ExplorePhase::Awaiting => write!(f, "Awaiting"),
            ExplorePhase::Answered => write!(f, "Answered"),
            ExplorePhase::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("question is empty")]
    EmptyQuestion,
}

/// Identifies one in-flight query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryTicket {
    pub session_id: Uuid,
    pub request_id: Uuid,
}

/// A query that has been accepted but not yet sent
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: QueryTicket,
    pub subject_id: SubjectId,
    pub question: String,
}

impl PendingQuery {
    /// Call the query service once
    pub async fn execute(self, service: &dyn QueryService) -> QueryOutcome {
        debug!(request_id = %self.ticket.request_id, "Sending question to query service");
        let result = service.ask(&self.subject_id, &self.question).await;
        QueryOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of a query, tagged with the ticket it was issued under
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub ticket: QueryTicket,
    pub result: Result<String, QueryError>,
}

pub struct ExploreSession {
    session_id: Uuid,
    subject_id: SubjectId,
    phase: ExplorePhase,
    question: String,
    answer: String,
    in_flight: Option<Uuid>,
    is_open: bool,
    messages: ViewerMessages,
    notifier: Arc<dyn NotificationSink>,
}

impl fmt::Debug for ExploreSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExploreSession")
            .field("session_id", &self.session_id)
            .field("subject_id", &self.subject_id)
            .field("phase", &self.phase)
            .field("question", &self.question)
            .field("answer", &self.answer)
            .field("in_flight", &self.in_flight)
            .field("is_open", &self.is_open)
            .finish()
    }
}

impl ExploreSession {
    /// Create an open session for `subject_id`
    pub fn new(
        subject_id: SubjectId,
        messages: ViewerMessages,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let mut session = Self {
            session_id: Uuid::new_v4(),
            subject_id,
            phase: ExplorePhase::Idle,
            question: String::new(),
            answer: String::new(),
            in_flight: None,
            is_open: false,
            messages,
            notifier,
        };
        session.open();
        session
    }

    /// Reset to a fresh `Idle` session
    ///
    /// Any query issued before this call can no longer complete here.
    pub fn open(&mut self) {
        self.session_id = Uuid::new_v4();
        self.phase = ExplorePhase::Idle;
        self.question.clear();
        self.answer.clear();
        self.in_flight = None;
        self.is_open = true;
        debug!(session_id = %self.session_id, subject_id = %self.subject_id, "Explore session opened");
    }

    pub fn close(&mut self) {
        if self.phase.is_awaiting() {
            info!(session_id = %self.session_id, "Closing explore session with a query in flight");
        }
        self.is_open = false;
        self.phase = ExplorePhase::Idle;
        self.question.clear();
        self.answer.clear();
        self.in_flight = None;
    }

    /// Store the question as typed; trimming happens at submit time
    pub fn set_question(&mut self, text: impl Into<String>) {
        if self.phase.is_awaiting() {
            return;
        }
        self.question = text.into();
    }

    pub fn can_submit(&self) -> bool {
        self.is_open && !self.phase.is_awaiting() && !self.question.trim().is_empty()
    }

    /// Validate and move to `Awaiting`
    ///
    /// Returns `Ok(None)` when a query is already in flight or the session
    /// is closed. An empty question raises a notification and leaves the
    /// state unchanged.
    pub fn begin_submit(&mut self) -> Result<Option<PendingQuery>, ValidationError> {
        if !self.is_open || self.phase.is_awaiting() {
            debug!(phase = %self.phase, "Ignoring submit");
            return Ok(None);
        }

        let question = self.question.trim();
        if question.is_empty() {
            self.notifier.notify(Notification::error(
                &self.messages.error_title,
                &self.messages.empty_question,
            ));
            return Err(ValidationError::EmptyQuestion);
        }

        let ticket = QueryTicket {
            session_id: self.session_id,
            request_id: Uuid::new_v4(),
        };
        let pending = PendingQuery {
            ticket,
            subject_id: self.subject_id.clone(),
            question: question.to_string(),
        };

        self.phase = ExplorePhase::Awaiting;
        self.answer.clear();
        self.in_flight = Some(ticket.request_id);

        Ok(Some(pending))
    }

    /// Apply a query outcome; returns false if it belongs to a stale ticket
    pub fn complete(&mut self, outcome: QueryOutcome) -> bool {
        let ticket = outcome.ticket;
        if !self.is_open
            || ticket.session_id != self.session_id
            || self.in_flight != Some(ticket.request_id)
        {
            debug!(request_id = %ticket.request_id, "Discarding outcome for stale query");
            return false;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(text) if text.is_empty() => {
                self.answer = self.messages.no_response.clone();
                self.phase = ExplorePhase::Answered;
            }
            Ok(text) => {
                self.answer = text;
                self.phase = ExplorePhase::Answered;
            }
            Err(e) => {
                error!("Error calling query service: {}", e);
                self.answer = self.messages.query_failed_answer.clone();
                self.phase = ExplorePhase::Failed;
                self.notifier.notify(Notification::error(
                    &self.messages.error_title,
                    &self.messages.query_failed_notification,
                ));
            }
        }

        true
    }

    /// Submit and wait for the answer in one step
    pub async fn submit(&mut self, service: &dyn QueryService) -> Result<(), ValidationError> {
        if let Some(pending) = self.begin_submit()? {
            let outcome = pending.execute(service).await;
            self.complete(outcome);
        }
        Ok(())
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn phase(&self) -> ExplorePhase {
        self.phase
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::mock::MockQueryService;
    use crate::integration::memory::MemoryNotifier;
    use crate::integration::sinks::Severity;

    fn session() -> (ExploreSession, MemoryNotifier) {
        let notifier = MemoryNotifier::new();
        let session = ExploreSession::new(
            SubjectId::new("call-1"),
            ViewerMessages::default(),
            Arc::new(notifier.clone()),
        );
        (session, notifier)
    }

    #[test]
    fn test_new_session_is_idle() {
        let (session, _) = session();
        assert_eq!(session.phase(), ExplorePhase::Idle);
        assert!(session.is_open());
        assert_eq!(session.question(), "");
        assert!(!session.can_submit());
    }

    #[test]
    fn test_question_stored_untrimmed() {
        let (mut session, _) = session();
        session.set_question("  what price?  ");
        assert_eq!(session.question(), "  what price?  ");
        assert!(session.can_submit());

        let pending = session.begin_submit().unwrap().unwrap();
        assert_eq!(pending.question, "what price?");
        assert_eq!(pending.subject_id, SubjectId::new("call-1"));
    }

    #[test]
    fn test_whitespace_question_rejected() {
        let (mut session, notifier) = session();
        session.set_question("   ");

        assert_eq!(session.begin_submit().unwrap_err(), ValidationError::EmptyQuestion);
        assert_eq!(session.phase(), ExplorePhase::Idle);

        let raised = notifier.get_all();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].title, "Error");
        assert_eq!(raised[0].message, "Please enter a question.");
        assert_eq!(raised[0].severity, Severity::Error);
    }

    #[test]
    fn test_submit_while_awaiting_is_noop() {
        let (mut session, _) = session();
        session.set_question("q");

        let first = session.begin_submit().unwrap();
        assert!(first.is_some());
        assert_eq!(session.phase(), ExplorePhase::Awaiting);
        assert!(!session.can_submit());

        assert!(session.begin_submit().unwrap().is_none());
    }

    #[test]
    fn test_question_locked_while_awaiting() {
        let (mut session, _) = session();
        session.set_question("q");
        session.begin_submit().unwrap();
        session.set_question("changed");
        assert_eq!(session.question(), "q");
    }

    #[test]
    fn test_complete_with_answer() {
        let (mut session, _) = session();
        session.set_question("q");
        let pending = session.begin_submit().unwrap().unwrap();

        assert!(session.complete(QueryOutcome {
            ticket: pending.ticket,
            result: Ok("The customer asked about financing.".to_string()),
        }));
        assert_eq!(session.phase(), ExplorePhase::Answered);
        assert_eq!(session.answer(), "The customer asked about financing.");
        assert!(session.can_submit());
    }

    #[test]
    fn test_empty_answer_uses_fallback() {
        let (mut session, _) = session();
        session.set_question("q");
        let pending = session.begin_submit().unwrap().unwrap();

        session.complete(QueryOutcome {
            ticket: pending.ticket,
            result: Ok(String::new()),
        });
        assert_eq!(session.answer(), "No response received from AI.");
    }

    #[test]
    fn test_failure_sets_message_and_notifies() {
        let (mut session, notifier) = session();
        session.set_question("q");
        let pending = session.begin_submit().unwrap().unwrap();

        session.complete(QueryOutcome {
            ticket: pending.ticket,
            result: Err(QueryError::Transport("reset".to_string())),
        });

        assert_eq!(session.phase(), ExplorePhase::Failed);
        assert_eq!(
            session.answer(),
            "Sorry, there was an error processing your request. Please try again."
        );
        assert_eq!(
            notifier.get_all()[0].message,
            "Failed to get AI response. Please try again."
        );
    }

    #[test]
    fn test_outcome_after_close_is_discarded() {
        let (mut session, notifier) = session();
        session.set_question("q");
        let pending = session.begin_submit().unwrap().unwrap();

        session.close();
        assert!(!session.complete(QueryOutcome {
            ticket: pending.ticket,
            result: Err(QueryError::Transport("late".to_string())),
        }));
        assert_eq!(session.phase(), ExplorePhase::Idle);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_outcome_after_reopen_is_discarded() {
        let (mut session, _) = session();
        session.set_question("q");
        let pending = session.begin_submit().unwrap().unwrap();

        session.open();
        assert!(!session.complete(QueryOutcome {
            ticket: pending.ticket,
            result: Ok("stale".to_string()),
        }));
        assert_eq!(session.answer(), "");
        assert_eq!(session.phase(), ExplorePhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let (mut session, _) = session();
        let service = MockQueryService::new().with_reply("42");

        session.set_question(" meaning? ");
        session.submit(&service).await.unwrap();

        assert_eq!(session.answer(), "42");
        assert_eq!(service.call_count(), 1);
        assert_eq!(service.calls()[0].question, "meaning?");
    }

    #[tokio::test]
    async fn test_submit_empty_never_calls_service() {
        let (mut session, notifier) = session();
        let service = MockQueryService::new();

        session.set_question("   ");
        assert!(session.submit(&service).await.is_err());
        assert_eq!(service.call_count(), 0);
        assert_eq!(notifier.len(), 1);
    }
}
