use std::time::Duration;

use chapter::DocumentError;
use thiserror::Error;

/// Why the last attempt of a generation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    #[error("completion service error: {0}")]
    Service(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unparseable completion: {0}")]
    Malformed(String),
}

/// Section-scoped generation failure, surfaced after the retry budget is spent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation failed after {attempts} attempt(s): {cause}")]
    GenerationFailed { attempts: u32, cause: FailureCause },
}

impl GenerationError {
    pub fn cause(&self) -> &FailureCause {
        match self {
            GenerationError::GenerationFailed { cause, .. } => cause,
        }
    }
}

/// Document-scoped pipeline failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("document processing timed out after {0:?}")]
    DocumentTimedOut(Duration),
}
