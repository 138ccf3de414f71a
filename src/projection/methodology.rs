//! Methodology step rows for the checklist table

use crate::analysis::{AnalysisModel, StepAssessment, StepKey, StepStatus};
use serde::Serialize;

/// One rendered row of the methodology checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodologyRow {
    pub step_key: String,
    pub display_label: String,
    pub status: StepStatus,
    pub status_label: String,
    pub evidence: String,
    pub icon_name: &'static str,
}

impl MethodologyRow {
    fn from_assessment(key: &str, assessment: &StepAssessment) -> Self {
        Self {
            step_key: key.to_string(),
            display_label: display_label(key).to_string(),
            status: assessment.status.clone(),
            status_label: status_label(&assessment.status).to_string(),
            evidence: assessment.evidence.clone().unwrap_or_default(),
            icon_name: status_icon(&assessment.status),
        }
    }
}

/// Project the methodology section into rows
///
/// Known steps come first in checklist order; unrecognized keys follow in
/// the order the document listed them.
pub fn project(model: &AnalysisModel) -> Vec<MethodologyRow> {
    let Some(steps) = model.sales_methodology_alignment.as_ref() else {
        return Vec::new();
    };

    let known = StepKey::ALL.iter().filter_map(|step| {
        steps
            .get_key_value(step.key())
            .map(|(key, assessment)| MethodologyRow::from_assessment(key, assessment))
    });

    let unknown = steps
        .iter()
        .filter(|(key, _)| StepKey::from_key(key).is_none())
        .map(|(key, assessment)| MethodologyRow::from_assessment(key, assessment));

    known.chain(unknown).collect()
}

pub fn display_label(key: &str) -> &str {
    StepKey::from_key(key).map_or(key, |step| step.display_label())
}

pub fn status_label(status: &StepStatus) -> &str {
    match status {
        StepStatus::Clearly => "Executed Well",
        StepStatus::Partially => "Partially Done",
        StepStatus::NotAtAll => "Missing",
        StepStatus::Other(raw) => raw.as_str(),
    }
}

pub fn status_icon(status: &StepStatus) -> &'static str {
    match status {
        StepStatus::Clearly => "success",
        StepStatus::Partially => "warning",
        StepStatus::NotAtAll => "error",
        StepStatus::Other(_) => "question_mark",
    }
}
