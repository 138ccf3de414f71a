//! Configuration for the insight viewer
//!
//! Holds the score scale, JSON formatting and every user-facing string the
//! view model produces. Loadable from TOML; missing keys fall back to the
//! defaults below.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// User-facing text
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerMessages {
    /// Answer shown when the query service returns an empty string
    pub no_response: String,

    /// Answer shown when the query service fails
    pub query_failed_answer: String,

    /// Title of error notifications
    pub error_title: String,

    /// Notification raised for an empty question
    pub empty_question: String,

    /// Notification raised when the query service fails
    pub query_failed_notification: String,
}

impl Default for ViewerMessages {
    fn default() -> Self {
        Self {
            no_response: "No response received from AI.".to_string(),
            query_failed_answer:
                "Sorry, there was an error processing your request. Please try again.".to_string(),
            error_title: "Error".to_string(),
            empty_question: "Please enter a question.".to_string(),
            query_failed_notification: "Failed to get AI response. Please try again.".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Upper bound of the rep effectiveness score
    pub score_scale: f64,

    /// Indentation width of the formatted JSON view
    pub json_indent: usize,

    pub messages: ViewerMessages,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            score_scale: 10.0,
            json_indent: 2,
            messages: ViewerMessages::default(),
        }
    }
}

impl ViewerConfig {
    pub fn with_score_scale(mut self, score_scale: f64) -> Self {
        self.score_scale = score_scale;
        self
    }

    pub fn with_json_indent(mut self, json_indent: usize) -> Self {
        self.json_indent = json_indent;
        self
    }

    pub fn with_messages(mut self, messages: ViewerMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.score_scale.is_finite() || self.score_scale <= 0.0 {
            return Err(format!(
                "score_scale must be a positive number, got {}",
                self.score_scale
            ));
        }

        if self.json_indent > 16 {
            return Err(format!("json_indent too large: {}", self.json_indent));
        }

        Ok(())
    }

    pub fn from_toml_str(text: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| crate::InsightError::ConfigError(e.to_string()))?;
        config.validate().map_err(crate::InsightError::ConfigError)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        debug!("Loading viewer config from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
