use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::jobs::{JobId, Operation};
use crate::wizard::state::Step;

#[derive(Error, Debug)]
pub enum DocAssistError {
    #[error("Invalid file {}: {reason}", path.display())]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Report generation failed: {0}")]
    ReportGenerationFailed(String),

    #[error("{operation} timed out after {}ms", after.as_millis())]
    Timeout { operation: Operation, after: Duration },

    #[error("{0} was cancelled")]
    Cancelled(Operation),

    #[error("Action '{action}' is not allowed at step {} ({})", step.index(), step.name())]
    InvalidTransition { step: Step, action: &'static str },

    #[error("Extraction query is empty")]
    EmptyQuery,

    #[error("Completion for job {0} does not match the pending job")]
    StaleJob(JobId),

    #[error("Invalid extraction result: {0}")]
    InvalidExtraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl DocAssistError {
    /// Whether the user can recover by retrying the same job
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DocAssistError::ExtractionFailed(_)
                | DocAssistError::ReportGenerationFailed(_)
                | DocAssistError::Timeout { .. }
                | DocAssistError::Cancelled(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DocAssistError>;
