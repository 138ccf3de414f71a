use crate::analysis::AnalysisModel;

/// Whether corrective-action affordances should be offered
///
/// True iff any methodology step was only partially done or missing.
pub fn should_show_actions(model: &AnalysisModel) -> bool {
    model
        .steps()
        .any(|(_, assessment)| assessment.status.needs_attention())
}
