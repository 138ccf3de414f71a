//! Query service abstraction
//!
//! The AI backend that answers free-form questions about a call lives
//! outside this crate. It is reached only through [`QueryService`].

use crate::integration::record::SubjectId;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The backend answered with an error
    #[error("query rejected: {0}")]
    Rejected(String),

    /// The request never reached the backend or the reply was lost
    #[error("transport failure: {0}")]
    Transport(String),

    /// No backend is available to take the request
    #[error("query service unavailable: {0}")]
    Unavailable(String),
}

/// Answers questions about a subject's conversation
///
/// An empty successful answer is valid. Timeouts are the implementor's
/// responsibility.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn ask(&self, subject_id: &SubjectId, question: &str) -> Result<String, QueryError>;
}
