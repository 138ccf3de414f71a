pub mod analysis;
pub mod explore;
pub mod integration;
pub mod projection;
pub mod ui;

use thiserror::Error;

pub use analysis::{parse, AnalysisModel, ParseError};
pub use explore::{ExplorePhase, ExploreSession, QueryError, QueryService, ValidationError};
pub use integration::{ClipboardError, ViewerConfig};
pub use ui::InsightViewModel;

#[derive(Error, Debug, Clone)]
pub enum InsightError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for InsightError {
    fn from(e: std::io::Error) -> Self {
        InsightError::IOError(e.to_string())
    }
}

impl InsightError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The view falls back to an empty model
            InsightError::Parse(_) => true,
            // The user may ask again
            InsightError::Query(_) => true,
            InsightError::Validation(_) => true,
            InsightError::Clipboard(_) => true,
            InsightError::ConfigError(_) => false,
            InsightError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            InsightError::Parse(_) => {
                "The call analysis could not be read.".to_string()
            }
            InsightError::Query(_) => {
                "Failed to get AI response. Please try again.".to_string()
            }
            InsightError::Validation(_) => "Please enter a question.".to_string(),
            InsightError::Clipboard(_) => "Could not copy to the clipboard.".to_string(),
            InsightError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            InsightError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_into_insight(raw: &str) -> Result<AnalysisModel> {
        Ok(parse(raw)?)
    }

    fn read_into_insight(path: &std::path::Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn test_parse_error_converts() {
        let err = parse_into_insight("not json").unwrap_err();
        assert!(matches!(err, InsightError::Parse(ParseError::Malformed(_))));
        assert!(err.is_recoverable());
        assert_eq!(err.user_message(), "The call analysis could not be read.");
        assert!(err.to_string().starts_with("Parse error:"));
    }

    #[test]
    fn test_io_error_converts() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_into_insight(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, InsightError::IOError(_)));
        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), "File system error occurred.");
    }

    #[test]
    fn test_user_messages() {
        let cases = [
            (
                InsightError::from(QueryError::Transport("timeout".into())),
                "Failed to get AI response. Please try again.",
                true,
            ),
            (
                InsightError::from(ValidationError::EmptyQuestion),
                "Please enter a question.",
                true,
            ),
            (
                InsightError::from(ClipboardError::Denied("sandbox".into())),
                "Could not copy to the clipboard.",
                true,
            ),
            (
                InsightError::ConfigError("bad scale".into()),
                "Configuration error. Please check settings.",
                false,
            ),
        ];

        for (err, message, recoverable) in cases {
            assert_eq!(err.user_message(), message);
            assert_eq!(err.is_recoverable(), recoverable, "{err}");
        }
    }
}
