pub mod parser;
pub mod types;

pub use parser::{parse, ParseError};
pub use types::{AnalysisModel, EffectivenessScore, Objection, StepAssessment, StepKey, StepStatus};
