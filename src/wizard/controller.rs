use std::path::Path;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use super::machine::{Action, Effect};
use super::state::{FileDescriptor, Notice, WizardState};
use crate::config::{AppConfig, UploadSettings};
use crate::jobs::{JobEvent, JobHandle, JobOutcome, JobRunner};
use crate::{DocAssistError, Result};

/// Owns the current snapshot and carries out transition effects
pub struct WizardController {
    state: WizardState,
    runner: JobRunner,
    active_job: Option<JobHandle>,
    progress: Option<f64>,
    upload: UploadSettings,
}

impl WizardController {
    pub fn new(runner: JobRunner, upload: UploadSettings) -> Self {
        Self {
            state: WizardState::new(),
            runner,
            active_job: None,
            progress: None,
            upload,
        }
    }

    /// Controller backed by the simulated collaborators, plus the receiver
    /// its jobs report to
    pub fn simulated(config: &AppConfig) -> (Self, UnboundedReceiver<JobEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let runner = JobRunner::simulated(config, event_tx);
        (Self::new(runner, config.upload.clone()), event_rx)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Progress of the pending job, if it has reported any
    pub fn progress(&self) -> Option<f64> {
        self.progress
    }

    pub fn upload_settings(&self) -> &UploadSettings {
        &self.upload
    }

    /// Describe the file at `path` and select it. Returns a hint notice when
    /// the extension is outside the accept filter.
    pub fn select_path(&mut self, path: &Path) -> Result<Vec<Notice>> {
        let file = FileDescriptor::from_path(path)?;
        let mut notices = Vec::new();

        if !file.matches_accept_filter(&self.upload.accepted_extensions) {
            if self.upload.strict_accept {
                return Err(DocAssistError::UnsupportedFormat(format!(
                    "{} (accepted: {})",
                    file.name,
                    self.upload.accept_filter()
                )));
            }
            warn!(file = %file.name, accepted = %self.upload.accept_filter(), "File outside accept filter");
            notices.push(Notice::new(
                "Unrecognised file type",
                format!(
                    "{} is not one of {}. Continuing anyway.",
                    file.name,
                    self.upload.accept_filter()
                ),
            ));
        }

        notices.extend(self.dispatch(Action::SelectFile(file))?);
        Ok(notices)
    }

    /// Apply `action` and run the resulting effects
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<Notice>> {
        let name = action.name();
        let transition = self.state.apply(action)?;

        if transition.state.step != self.state.step {
            info!(
                action = name,
                from = self.state.step.index(),
                to = transition.state.step.index(),
                "Wizard advanced to {}",
                transition.state.step
            );
        } else {
            debug!(action = name, step = self.state.step.index(), "Wizard updated");
        }
        self.state = transition.state;

        let mut notices = Vec::new();
        for effect in transition.effects {
            match effect {
                Effect::StartExtraction { id, request } => {
                    self.progress = Some(0.0);
                    self.active_job = Some(self.runner.spawn_extraction(id, request));
                }
                Effect::StartReport { id, request } => {
                    self.progress = Some(0.0);
                    self.active_job = Some(self.runner.spawn_report(id, request));
                }
                Effect::CancelJob(id) => {
                    if let Some(mut handle) = self.active_job.take() {
                        if handle.id() == id {
                            info!(job = %id, operation = %handle.operation(), "Cancelling job");
                            handle.cancel();
                        } else {
                            self.active_job = Some(handle);
                        }
                    }
                    self.progress = None;
                }
                Effect::Notify(notice) => {
                    info!(title = %notice.title, "{}", notice.message);
                    notices.push(notice);
                }
            }
        }
        Ok(notices)
    }

    /// Feed one job event through the wizard. Events for jobs that are no
    /// longer pending are dropped.
    pub fn handle_job_event(&mut self, event: JobEvent) -> Result<()> {
        match event {
            JobEvent::Progress { id, progress, .. } => {
                if self.state.pending_job == Some(id) {
                    self.progress = Some(progress);
                }
                Ok(())
            }
            JobEvent::Finished { id, operation, outcome } => {
                let action = match outcome {
                    JobOutcome::Extracted(result) => Action::ExtractionSucceeded { id, result },
                    JobOutcome::Reported(report) => Action::ReportSucceeded { id, report },
                    JobOutcome::Failed(failure) => Action::JobFailed { id, failure },
                };

                match self.dispatch(action) {
                    Ok(_) => {
                        if self.active_job.as_ref().map(|h| h.id()) == Some(id) {
                            self.active_job = None;
                        }
                        self.progress = None;
                        Ok(())
                    }
                    Err(DocAssistError::StaleJob(stale)) => {
                        debug!(job = %stale, %operation, "Dropping outcome of stale job");
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Process job events until no job is pending
    pub async fn run_until_idle(&mut self, event_rx: &mut UnboundedReceiver<JobEvent>) -> Result<()> {
        while self.state.is_busy() {
            let event = event_rx
                .recv()
                .await
                .ok_or_else(|| anyhow::anyhow!("Job event channel closed"))?;
            self.handle_job_event(event)?;
        }
        Ok(())
    }
}
