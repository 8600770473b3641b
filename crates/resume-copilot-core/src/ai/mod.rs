pub mod resume;

pub use resume::ResumeClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::state::ChatResponse;

/// Description used when the backend gives us nothing better
pub const GENERIC_FAILURE: &str = "Failed to fetch chat response";

/// The only failure a resume query can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    #[error("{0}")]
    RequestFailed(String),
}

impl AskError {
    /// Build from a response body, falling back to the generic message when it is empty
    pub fn from_body(body: &str) -> Self {
        if body.is_empty() {
            Self::generic()
        } else {
            AskError::RequestFailed(body.to_string())
        }
    }

    pub fn generic() -> Self {
        AskError::RequestFailed(GENERIC_FAILURE.to_string())
    }

    pub fn description(&self) -> &str {
        match self {
            AskError::RequestFailed(msg) => msg,
        }
    }
}

/// Anything that can answer a question about the resume.
#[async_trait]
pub trait ResumeQuery: Send + Sync {
    async fn ask(&self, question: &str) -> Result<ChatResponse, AskError>;
}
