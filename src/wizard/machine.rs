//! Transition function of the wizard
//!
//! `WizardState::apply` never mutates the snapshot it is called on and never
//! performs I/O. Work that has to happen outside the state (spawning or
//! cancelling a job, showing a notice) is returned as [`Effect`]s for the
//! controller to carry out. A rejected action returns an error and leaves the
//! caller's snapshot as it was.

use super::state::{ExtractionResult, FileDescriptor, Notice, Report, Step, WizardState};
use crate::jobs::{ExtractionRequest, JobFailure, JobId, Operation, ReportRequest};
use crate::{DocAssistError, Result};

/// Inputs to the wizard: user actions and job completions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectFile(FileDescriptor),
    EditQuery(String),
    SubmitQuery,
    ExtractionSucceeded { id: JobId, result: ExtractionResult },
    ReportSucceeded { id: JobId, report: Report },
    JobFailed { id: JobId, failure: JobFailure },
    Retry,
    Cancel,
    RequestReport,
    DownloadSpreadsheet,
    DownloadReport,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectFile(_) => "select file",
            Action::EditQuery(_) => "edit query",
            Action::SubmitQuery => "submit query",
            Action::ExtractionSucceeded { .. } => "extraction succeeded",
            Action::ReportSucceeded { .. } => "report succeeded",
            Action::JobFailed { .. } => "job failed",
            Action::Retry => "retry",
            Action::Cancel => "cancel",
            Action::RequestReport => "request report",
            Action::DownloadSpreadsheet => "download spreadsheet",
            Action::DownloadReport => "download report",
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartExtraction { id: JobId, request: ExtractionRequest },
    StartReport { id: JobId, request: ReportRequest },
    CancelJob(JobId),
    Notify(Notice),
}

/// Next snapshot plus the effects to run
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WizardState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: WizardState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: WizardState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

impl WizardState {
    /// Compute the transition for `action` from this snapshot
    pub fn apply(&self, action: Action) -> Result<Transition> {
        let name = action.name();
        let transition = match action {
            Action::SelectFile(file) => self.select_file(file, name),
            Action::EditQuery(text) => self.edit_query(text, name),
            Action::SubmitQuery => self.submit_query(name),
            Action::ExtractionSucceeded { id, result } => self.extraction_succeeded(id, result, name),
            Action::ReportSucceeded { id, report } => self.report_succeeded(id, report, name),
            Action::JobFailed { id, failure } => self.job_failed(id, failure),
            Action::Retry => self.retry(name),
            Action::Cancel => self.cancel(name),
            Action::RequestReport => self.request_report(name),
            Action::DownloadSpreadsheet => self.download_spreadsheet(name),
            Action::DownloadReport => self.download_report(name),
        }?;

        debug_assert!(transition.state.step >= self.step, "step must never decrease");
        Ok(transition)
    }

    fn reject(&self, action: &'static str) -> DocAssistError {
        DocAssistError::InvalidTransition {
            step: self.step,
            action,
        }
    }

    fn require(&self, step: Step, action: &'static str) -> Result<()> {
        if self.step == step {
            Ok(())
        } else {
            Err(self.reject(action))
        }
    }

    fn require_pending(&self, id: JobId) -> Result<()> {
        if self.pending_job == Some(id) {
            Ok(())
        } else {
            Err(DocAssistError::StaleJob(id))
        }
    }

    fn select_file(&self, file: FileDescriptor, action: &'static str) -> Result<Transition> {
        self.require(Step::AwaitUpload, action)?;
        let mut next = self.clone();
        next.file = Some(file);
        next.step = Step::AwaitQuery;
        Ok(Transition::to(next))
    }

    fn edit_query(&self, text: String, action: &'static str) -> Result<Transition> {
        self.require(Step::AwaitQuery, action)?;
        let mut next = self.clone();
        next.query = text;
        Ok(Transition::to(next))
    }

    fn submit_query(&self, action: &'static str) -> Result<Transition> {
        self.require(Step::AwaitQuery, action)?;
        if !self.can_submit_query() {
            return Err(DocAssistError::EmptyQuery);
        }
        let mut next = self.clone();
        next.step = Step::Extracting;
        let effect = next.start_extraction(action)?;
        Ok(Transition::with(next, effect))
    }

    fn extraction_succeeded(&self, id: JobId, result: ExtractionResult, action: &'static str) -> Result<Transition> {
        self.require_pending(id)?;
        self.require(Step::Extracting, action)?;
        let mut next = self.clone();
        next.pending_job = None;
        next.failure = None;
        next.extraction = Some(result);
        next.step = Step::PreviewReady;
        Ok(Transition::to(next))
    }

    fn report_succeeded(&self, id: JobId, report: Report, action: &'static str) -> Result<Transition> {
        self.require_pending(id)?;
        self.require(Step::ReportReady, action)?;
        let mut next = self.clone();
        next.pending_job = None;
        next.failure = None;
        next.report = Some(report);
        Ok(Transition::to(next))
    }

    fn job_failed(&self, id: JobId, failure: JobFailure) -> Result<Transition> {
        self.require_pending(id)?;
        let mut next = self.clone();
        next.pending_job = None;
        next.failure = Some(failure);
        Ok(Transition::to(next))
    }

    fn retry(&self, action: &'static str) -> Result<Transition> {
        if !self.can_retry() {
            return Err(self.reject(action));
        }
        let mut next = self.clone();
        let effect = match self.step {
            Step::Extracting => next.start_extraction(action)?,
            Step::ReportReady => next.start_report(action)?,
            _ => return Err(self.reject(action)),
        };
        Ok(Transition::with(next, effect))
    }

    fn cancel(&self, action: &'static str) -> Result<Transition> {
        let operation = match self.step {
            Step::Extracting => Operation::Extraction,
            Step::ReportReady => Operation::ReportGeneration,
            _ => return Err(self.reject(action)),
        };
        let id = self.pending_job.ok_or_else(|| self.reject(action))?;

        let mut next = self.clone();
        next.pending_job = None;
        next.failure = Some(JobFailure::cancelled(operation));
        Ok(Transition::with(next, Effect::CancelJob(id)))
    }

    fn request_report(&self, action: &'static str) -> Result<Transition> {
        self.require(Step::PreviewReady, action)?;
        if self.is_busy() {
            return Err(self.reject(action));
        }
        let mut next = self.clone();
        next.step = Step::ReportReady;
        let effect = next.start_report(action)?;
        Ok(Transition::with(next, effect))
    }

    fn download_spreadsheet(&self, action: &'static str) -> Result<Transition> {
        if self.extraction.is_none() {
            return Err(self.reject(action));
        }
        Ok(Transition::with(
            self.clone(),
            Effect::Notify(Notice::new("Download Excel", "Excel file downloaded!")),
        ))
    }

    fn download_report(&self, action: &'static str) -> Result<Transition> {
        if self.report.is_none() {
            return Err(self.reject(action));
        }
        Ok(Transition::with(
            self.clone(),
            Effect::Notify(Notice::new("Download Full Report", "Report downloaded!")),
        ))
    }

    /// Mark a fresh extraction job pending and describe it
    fn start_extraction(&mut self, action: &'static str) -> Result<Effect> {
        let document = self.file.clone().ok_or_else(|| self.reject(action))?;
        let id = JobId::new();
        self.pending_job = Some(id);
        self.failure = None;
        Ok(Effect::StartExtraction {
            id,
            request: ExtractionRequest {
                document,
                query: self.query.trim().to_string(),
            },
        })
    }

    fn start_report(&mut self, action: &'static str) -> Result<Effect> {
        let extraction = self.extraction.clone().ok_or_else(|| self.reject(action))?;
        let id = JobId::new();
        self.pending_job = Some(id);
        self.failure = None;
        Ok(Effect::StartReport {
            id,
            request: ReportRequest {
                extraction,
                query: self.query.trim().to_string(),
            },
        })
    }
}
