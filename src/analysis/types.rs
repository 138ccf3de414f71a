//! Typed view of the raw call analysis document
//!
//! Section names follow the analysis generator (`SalesMethodologyAlignment`,
//! `ObjectionsRaised`, `RepEffectivenessScore`); camelCase spellings are
//! accepted as aliases. Fields this crate does not interpret are kept in
//! `extra` maps so the document survives a round trip.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Outcome of one methodology step as judged by the analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepStatus {
    /// The rep executed the step well
    Clearly,
    /// The step was attempted but incomplete
    Partially,
    /// The step was skipped
    NotAtAll,
    /// Any status string the generator produced that we do not recognize
    Other(String),
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Clearly => "Clearly",
            StepStatus::Partially => "Partially",
            StepStatus::NotAtAll => "NotAtAll",
            StepStatus::Other(raw) => raw.as_str(),
        }
    }

    /// Whether this status calls for corrective action
    pub fn needs_attention(&self) -> bool {
        matches!(self, StepStatus::Partially | StepStatus::NotAtAll)
    }
}

impl From<String> for StepStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Clearly" => StepStatus::Clearly,
            "Partially" => StepStatus::Partially,
            "NotAtAll" => StepStatus::NotAtAll,
            _ => StepStatus::Other(raw),
        }
    }
}

impl From<&str> for StepStatus {
    fn from(raw: &str) -> Self {
        StepStatus::from(raw.to_string())
    }
}

impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        match status {
            StepStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven steps of the sales methodology checklist, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKey {
    BuildRapport,
    QualifyCustomer,
    ExplainProcess,
    HighlightBenefits,
    HandleObjections,
    Close,
    ConfirmNextSteps,
}

impl StepKey {
    pub const ALL: [StepKey; 7] = [
        StepKey::BuildRapport,
        StepKey::QualifyCustomer,
        StepKey::ExplainProcess,
        StepKey::HighlightBenefits,
        StepKey::HandleObjections,
        StepKey::Close,
        StepKey::ConfirmNextSteps,
    ];

    /// Key as it appears in the analysis document
    pub fn key(&self) -> &'static str {
        match self {
            StepKey::BuildRapport => "BuildRapport",
            StepKey::QualifyCustomer => "QualifyCustomer",
            StepKey::ExplainProcess => "ExplainProcess",
            StepKey::HighlightBenefits => "HighlightBenefits",
            StepKey::HandleObjections => "HandleObjections",
            StepKey::Close => "Close",
            StepKey::ConfirmNextSteps => "ConfirmNextSteps",
        }
    }

    /// Human-readable label shown in the methodology table
    pub fn display_label(&self) -> &'static str {
        match self {
            StepKey::BuildRapport => "Build Rapport",
            StepKey::QualifyCustomer => "Qualify Customer",
            StepKey::ExplainProcess => "Explain Process",
            StepKey::HighlightBenefits => "Highlight Benefits",
            StepKey::HandleObjections => "Handle Objections",
            StepKey::Close => "Call to Action / Close",
            StepKey::ConfirmNextSteps => "Confirm Next Steps",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|step| step.key() == key)
    }
}

/// Assessment of a single methodology step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAssessment {
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StepAssessment {
    pub fn new(status: impl Into<StepStatus>, evidence: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            evidence: Some(evidence.into()),
            extra: Map::new(),
        }
    }
}

/// A customer objection identified in the call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objection {
    #[serde(rename = "objectionText", default, skip_serializing_if = "Option::is_none")]
    pub objection_text: Option<String>,
    #[serde(
        rename = "handledEffectively",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub handled_effectively: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Objection {
    pub fn new(text: impl Into<String>, handled_effectively: bool) -> Self {
        Self {
            objection_text: Some(text.into()),
            handled_effectively: Some(handled_effectively),
            extra: Map::new(),
        }
    }

    /// A missing flag counts as not handled
    pub fn is_handled(&self) -> bool {
        self.handled_effectively.unwrap_or(false)
    }

    pub fn text(&self) -> &str {
        self.objection_text.as_deref().unwrap_or_default()
    }
}

/// Overall rep effectiveness, scored 0 to 10
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EffectivenessScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parsed call analysis
///
/// Every section is optional. Absence means "no data for this section";
/// a section with the wrong shape is rejected by the parser as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisModel {
    #[serde(
        rename = "SalesMethodologyAlignment",
        alias = "salesMethodologyAlignment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sales_methodology_alignment: Option<IndexMap<String, StepAssessment>>,

    #[serde(
        rename = "ObjectionsRaised",
        alias = "objectionsRaised",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub objections_raised: Option<Vec<Objection>>,

    #[serde(
        rename = "RepEffectivenessScore",
        alias = "repEffectivenessScore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rep_effectiveness_score: Option<EffectivenessScore>,

    /// Top-level sections this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, key: impl Into<String>, assessment: StepAssessment) -> Self {
        self.sales_methodology_alignment
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), assessment);
        self
    }

    pub fn with_objection(mut self, objection: Objection) -> Self {
        self.objections_raised
            .get_or_insert_with(Vec::new)
            .push(objection);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.rep_effectiveness_score = Some(EffectivenessScore {
            score: Some(score),
            extra: Map::new(),
        });
        self
    }

    /// The rep effectiveness score, if the analysis carries one
    pub fn score(&self) -> Option<f64> {
        self.rep_effectiveness_score.as_ref().and_then(|s| s.score)
    }

    /// Steps in source order, empty when the section is absent
    pub fn steps(&self) -> impl Iterator<Item = (&String, &StepAssessment)> {
        self.sales_methodology_alignment.iter().flat_map(|m| m.iter())
    }

    pub fn objections(&self) -> &[Objection] {
        self.objections_raised.as_deref().unwrap_or_default()
    }
}
