//! View model for the call insight viewer
//!
//! This module provides the state the rendering layer reads. All derived
//! analysis state is rebuilt together from each new raw document, and the
//! explore dialog is delegated to an [`ExploreSession`].

use crate::analysis::{self, AnalysisModel, ParseError};
use crate::explore::{
    ExplorePhase, ExploreSession, PendingQuery, QueryError, QueryOutcome, QueryService,
};
use crate::integration::{
    ActionSink, ClipboardSink, InsightAction, NotificationSink, RecordFeed, RecordUpdate,
    SubjectId, ViewerConfig,
};
use crate::projection::{self, MethodologyRow, ObjectionRow};
use crate::ui::display;
use crate::InsightError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// External services the view model talks to
#[derive(Clone)]
pub struct Collaborators {
    pub query_service: Arc<dyn QueryService>,
    pub notifier: Arc<dyn NotificationSink>,
    pub clipboard: Arc<dyn ClipboardSink>,
    pub actions: Arc<dyn ActionSink>,
}

/// Everything derived from one raw analysis document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedState {
    pub model: Option<AnalysisModel>,
    pub methodology_rows: Vec<MethodologyRow>,
    pub objection_rows: Vec<ObjectionRow>,
    pub show_action_buttons: bool,
}

impl DerivedState {
    /// Parse and project a raw document
    pub fn from_raw(raw: &str) -> Result<Self, ParseError> {
        let model = analysis::parse(raw)?;
        Ok(Self::from_model(model))
    }

    pub fn from_model(model: AnalysisModel) -> Self {
        Self {
            methodology_rows: projection::methodology::project(&model),
            objection_rows: projection::objections::project(&model),
            show_action_buttons: projection::should_show_actions(&model),
            model: Some(model),
        }
    }
}

pub struct InsightViewModel {
    config: ViewerConfig,
    subject_id: SubjectId,
    raw_analysis: String,
    derived: DerivedState,
    last_parse_error: Option<ParseError>,

    /// Whether the raw JSON dialog is shown
    pub show_json_modal: bool,

    /// Whether the explore dialog is shown
    pub show_explore_modal: bool,

    explore: Option<ExploreSession>,
    collaborators: Collaborators,

    outcome_tx: Sender<QueryOutcome>,
    outcome_rx: Receiver<QueryOutcome>,
}

impl InsightViewModel {
    pub fn new(subject_id: impl Into<SubjectId>, collaborators: Collaborators) -> Self {
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            config: ViewerConfig::default(),
            subject_id: subject_id.into(),
            raw_analysis: String::new(),
            derived: DerivedState::default(),
            last_parse_error: None,
            show_json_modal: false,
            show_explore_modal: false,
            explore: None,
            collaborators,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    // Record updates

    /// Replace all derived state from a new record
    ///
    /// On a parse failure the derived state is cleared and the error is
    /// returned; the view stays usable either way. A switch to another
    /// subject restarts a live explore session for the new subject, so
    /// answers to questions about the old one are dropped.
    pub fn apply_record(&mut self, update: RecordUpdate) -> Result<(), ParseError> {
        let subject_changed = update.subject_id != self.subject_id;
        self.subject_id = update.subject_id;
        self.raw_analysis = update.raw_analysis;

        if subject_changed {
            if let Some(mut session) = self.explore.take() {
                session.close();
                debug!(subject_id = %self.subject_id, "Subject changed, restarting explore session");
                self.explore = Some(self.new_session());
            }
        }

        match DerivedState::from_raw(&self.raw_analysis) {
            Ok(derived) => {
                debug!(
                    subject_id = %self.subject_id,
                    rows = derived.methodology_rows.len(),
                    objections = derived.objection_rows.len(),
                    "Analysis updated"
                );
                self.derived = derived;
                self.last_parse_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(subject_id = %self.subject_id, "Failed to parse analysis: {}", e);
                self.derived = DerivedState::default();
                self.last_parse_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Apply the newest pending update from `feed`, skipping superseded ones
    pub fn poll_records(&mut self, feed: &RecordFeed) -> bool {
        match feed.latest() {
            Some(update) => {
                // Failures are already logged and reflected in the cleared state
                let _ = self.apply_record(update);
                true
            }
            None => false,
        }
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn raw_analysis(&self) -> &str {
        &self.raw_analysis
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    pub fn model(&self) -> Option<&AnalysisModel> {
        self.derived.model.as_ref()
    }

    pub fn methodology_rows(&self) -> &[MethodologyRow] {
        &self.derived.methodology_rows
    }

    pub fn objection_rows(&self) -> &[ObjectionRow] {
        &self.derived.objection_rows
    }

    pub fn show_action_buttons(&self) -> bool {
        self.derived.show_action_buttons
    }

    pub fn last_parse_error(&self) -> Option<&ParseError> {
        self.last_parse_error.as_ref()
    }

    // Derived display values

    pub fn effectiveness_bar_width(&self) -> f64 {
        display::effectiveness_bar_width(
            self.model().and_then(AnalysisModel::score),
            self.config.score_scale,
        )
    }

    pub fn effectiveness_bar_style(&self) -> String {
        display::bar_style(self.effectiveness_bar_width())
    }

    pub fn formatted_json(&self) -> String {
        display::pretty_json(&self.raw_analysis, self.config.json_indent)
    }

    // JSON dialog

    pub fn show_json(&mut self) {
        self.show_json_modal = true;
    }

    pub fn close_json(&mut self) {
        self.show_json_modal = false;
    }

    /// Copy the formatted JSON; the outcome is only logged
    pub fn copy_json(&self) {
        match self.collaborators.clipboard.write_text(&self.formatted_json()) {
            Ok(()) => info!("JSON copied to clipboard"),
            Err(e) => {
                let e = InsightError::from(e);
                warn!("{} ({})", e.user_message(), e);
            }
        }
    }

    // Outbound actions

    pub fn schedule_meeting(&self) {
        self.emit(InsightAction::ScheduleMeeting {
            subject_id: self.subject_id.clone(),
        });
    }

    pub fn enroll_to_enablement(&self) {
        self.emit(InsightAction::EnrollToEnablement {
            subject_id: self.subject_id.clone(),
        });
    }

    pub fn export_insights(&self) {
        self.emit(InsightAction::ExportInsights {
            subject_id: self.subject_id.clone(),
            model: self.derived.model.clone(),
        });
    }

    pub fn refresh_analysis(&self) {
        self.emit(InsightAction::RefreshAnalysis {
            subject_id: self.subject_id.clone(),
        });
    }

    fn emit(&self, action: InsightAction) {
        info!(event = action.event_name(), subject_id = %self.subject_id, "Emitting action");
        self.collaborators.actions.emit(action);
    }

    // Explore dialog

    pub fn open_explore(&mut self) {
        self.show_explore_modal = true;
        self.explore = Some(self.new_session());
    }

    fn new_session(&self) -> ExploreSession {
        ExploreSession::new(
            self.subject_id.clone(),
            self.config.messages.clone(),
            Arc::clone(&self.collaborators.notifier),
        )
    }

    pub fn close_explore(&mut self) {
        self.show_explore_modal = false;
        if let Some(mut session) = self.explore.take() {
            session.close();
        }
    }

    pub fn explore_session(&self) -> Option<&ExploreSession> {
        self.explore.as_ref()
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        if let Some(session) = self.explore.as_mut() {
            session.set_question(text);
        }
    }

    pub fn question(&self) -> &str {
        self.explore.as_ref().map_or("", ExploreSession::question)
    }

    pub fn answer(&self) -> &str {
        self.explore.as_ref().map_or("", ExploreSession::answer)
    }

    pub fn explore_phase(&self) -> ExplorePhase {
        self.explore
            .as_ref()
            .map_or(ExplorePhase::Idle, ExploreSession::phase)
    }

    pub fn is_exploring(&self) -> bool {
        self.explore_phase().is_awaiting()
    }

    pub fn can_submit(&self) -> bool {
        self.explore.as_ref().is_some_and(ExploreSession::can_submit)
    }

    pub fn is_submit_disabled(&self) -> bool {
        !self.can_submit()
    }

    /// Start a query; `None` if nothing was sent
    ///
    /// Validation failures are reported through the notifier by the session.
    pub fn submit_question(&mut self) -> Option<PendingQuery> {
        self.explore.as_mut()?.begin_submit().ok().flatten()
    }

    /// Submit and wait for the answer
    pub async fn ask(&mut self) {
        let Some(pending) = self.submit_question() else {
            return;
        };
        let service = Arc::clone(&self.collaborators.query_service);
        let outcome = pending.execute(service.as_ref()).await;
        self.complete_query(outcome);
    }

    /// Submit on the ambient tokio runtime
    ///
    /// The outcome is delivered through [`InsightViewModel::poll_events`],
    /// so the dialog can be closed while the query is in flight.
    pub fn dispatch_question(&mut self) -> bool {
        let Some(pending) = self.submit_question() else {
            return false;
        };

        let ticket = pending.ticket;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let service = Arc::clone(&self.collaborators.query_service);
                let tx = self.outcome_tx.clone();
                handle.spawn(async move {
                    let outcome = pending.execute(service.as_ref()).await;
                    let _ = tx.send(outcome);
                });
            }
            Err(e) => {
                self.complete_query(QueryOutcome {
                    ticket,
                    result: Err(QueryError::Unavailable(e.to_string())),
                });
            }
        }
        true
    }

    /// Apply outcomes of dispatched queries; returns how many were applied
    pub fn poll_events(&mut self) -> usize {
        let outcomes: Vec<QueryOutcome> = self.outcome_rx.try_iter().collect();
        let mut applied = 0;
        for outcome in outcomes {
            if self.complete_query(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Route an outcome to the live session, if it is still the one that asked
    pub fn complete_query(&mut self, outcome: QueryOutcome) -> bool {
        match self.explore.as_mut() {
            Some(session) => session.complete(outcome),
            None => {
                debug!(request_id = %outcome.ticket.request_id, "Explore dialog closed, discarding answer");
                false
            }
        }
    }
}
