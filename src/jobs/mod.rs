//! Asynchronous jobs behind the wizard
//!
//! Extraction and report generation run as tokio tasks. Each job reports
//! progress and exactly one outcome back to the controller over an mpsc
//! channel, tagged with the [`JobId`] it was started with. The controller
//! drops outcomes whose id is no longer pending (cancelled or superseded).

pub mod extractor;
pub mod report;
pub mod runner;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::sleep;
use uuid::Uuid;

use crate::wizard::state::{ExtractionResult, Report};
use crate::DocAssistError;

pub use extractor::{sample_extraction, ExtractionRequest, Extractor, SimulatedExtractor};
pub use report::{sample_report, ReportGenerator, ReportRequest, SimulatedReportGenerator};
pub use runner::{JobHandle, JobRunner};

/// Identifier of one submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of work a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Extraction,
    ReportGeneration,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Extraction => write!(f, "Extraction"),
            Operation::ReportGeneration => write!(f, "Report generation"),
        }
    }
}

/// Why a job did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    Failed,
    TimedOut { after_ms: u64 },
    Cancelled,
}

/// Failure recorded on the wizard snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub operation: Operation,
    pub kind: FailureKind,
    pub message: String,
}

impl JobFailure {
    pub fn failed(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: FailureKind::Failed,
            message: message.into(),
        }
    }

    pub fn timed_out(operation: Operation, after: Duration) -> Self {
        Self {
            operation,
            kind: FailureKind::TimedOut {
                after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
            },
            message: format!("{} timed out after {}ms", operation, after.as_millis()),
        }
    }

    pub fn cancelled(operation: Operation) -> Self {
        Self {
            operation,
            kind: FailureKind::Cancelled,
            message: format!("{} was cancelled", operation),
        }
    }

    /// Map onto the crate error taxonomy
    pub fn into_error(self) -> DocAssistError {
        match (self.kind, self.operation) {
            (FailureKind::Failed, Operation::Extraction) => DocAssistError::ExtractionFailed(self.message),
            (FailureKind::Failed, Operation::ReportGeneration) => {
                DocAssistError::ReportGenerationFailed(self.message)
            }
            (FailureKind::TimedOut { after_ms }, operation) => DocAssistError::Timeout {
                operation,
                after: Duration::from_millis(after_ms),
            },
            (FailureKind::Cancelled, operation) => DocAssistError::Cancelled(operation),
        }
    }
}

/// Terminal result of a job
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Extracted(ExtractionResult),
    Reported(Report),
    Failed(JobFailure),
}

/// Messages sent from running jobs to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Progress {
        id: JobId,
        operation: Operation,
        progress: f64,
    },
    Finished {
        id: JobId,
        operation: Operation,
        outcome: JobOutcome,
    },
}

impl JobEvent {
    pub fn id(&self) -> JobId {
        match self {
            JobEvent::Progress { id, .. } | JobEvent::Finished { id, .. } => *id,
        }
    }
}

/// Progress reporting handle passed to collaborators
#[derive(Debug, Clone)]
pub struct ProgressSink {
    id: JobId,
    operation: Operation,
    tx: Option<UnboundedSender<JobEvent>>,
}

impl ProgressSink {
    pub fn new(id: JobId, operation: Operation, tx: UnboundedSender<JobEvent>) -> Self {
        Self {
            id,
            operation,
            tx: Some(tx),
        }
    }

    /// A sink that drops every update
    pub fn noop(operation: Operation) -> Self {
        Self {
            id: JobId::new(),
            operation,
            tx: None,
        }
    }

    /// Report progress in `0.0..=1.0`
    pub fn report(&self, progress: f64) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(JobEvent::Progress {
                id: self.id,
                operation: self.operation,
                progress: progress.clamp(0.0, 1.0),
            });
        }
    }
}

/// Stand-in latency for simulated collaborators: ten equal slices with a
/// progress update after each.
pub async fn simulate_latency(latency: Duration, progress: &ProgressSink) {
    let steps: u32 = 10;
    for i in 1..=steps {
        sleep(latency / steps).await;
        progress.report(i as f64 / steps as f64);
    }
}
