use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{
    ExtractionRequest, Extractor, JobEvent, JobFailure, JobId, JobOutcome, Operation, ProgressSink,
    ReportGenerator, ReportRequest,
};
use crate::config::AppConfig;
use crate::Result;

/// Handle to a spawned job
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    operation: Operation,
    cancel_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Request cancellation. Calling it more than once is a no-op.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawns extraction and report jobs and forwards their events
pub struct JobRunner {
    extractor: Arc<dyn Extractor>,
    reporter: Arc<dyn ReportGenerator>,
    extraction_timeout: Duration,
    report_timeout: Duration,
    event_tx: UnboundedSender<JobEvent>,
}

impl JobRunner {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        reporter: Arc<dyn ReportGenerator>,
        event_tx: UnboundedSender<JobEvent>,
    ) -> Self {
        Self {
            extractor,
            reporter,
            extraction_timeout: Duration::from_secs(30),
            report_timeout: Duration::from_secs(30),
            event_tx,
        }
    }

    /// Runner with simulated collaborators configured from `config`
    pub fn simulated(config: &AppConfig, event_tx: UnboundedSender<JobEvent>) -> Self {
        Self::new(
            Arc::new(super::SimulatedExtractor::new(config.extraction.latency())),
            Arc::new(super::SimulatedReportGenerator::new(config.report.latency())),
            event_tx,
        )
        .with_timeouts(config.extraction.timeout(), config.report.timeout())
    }

    pub fn with_timeouts(mut self, extraction: Duration, report: Duration) -> Self {
        self.extraction_timeout = extraction;
        self.report_timeout = report;
        self
    }

    pub fn spawn_extraction(&self, id: JobId, request: ExtractionRequest) -> JobHandle {
        let extractor = Arc::clone(&self.extractor);
        let progress = ProgressSink::new(id, Operation::Extraction, self.event_tx.clone());
        self.spawn(
            id,
            Operation::Extraction,
            self.extraction_timeout,
            async move { extractor.extract(request, progress).await },
            JobOutcome::Extracted,
        )
    }

    pub fn spawn_report(&self, id: JobId, request: ReportRequest) -> JobHandle {
        let reporter = Arc::clone(&self.reporter);
        let progress = ProgressSink::new(id, Operation::ReportGeneration, self.event_tx.clone());
        self.spawn(
            id,
            Operation::ReportGeneration,
            self.report_timeout,
            async move { reporter.generate(request, progress).await },
            JobOutcome::Reported,
        )
    }

    fn spawn<T, F>(
        &self,
        id: JobId,
        operation: Operation,
        timeout: Duration,
        work: F,
        wrap: fn(T) -> JobOutcome,
    ) -> JobHandle
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let event_tx = self.event_tx.clone();

        let join = tokio::spawn(async move {
            info!(job = %id, %operation, "Job started");

            // A dropped handle closes the channel without cancelling
            let outcome = tokio::select! {
                result = tokio::time::timeout(timeout, work) => match result {
                    Ok(Ok(value)) => wrap(value),
                    Ok(Err(e)) => {
                        warn!(job = %id, %operation, error = %e, "Job failed");
                        JobOutcome::Failed(JobFailure::failed(operation, e.to_string()))
                    }
                    Err(_) => {
                        warn!(job = %id, %operation, timeout_ms = timeout.as_millis() as u64, "Job timed out");
                        JobOutcome::Failed(JobFailure::timed_out(operation, timeout))
                    }
                },
                Ok(()) = cancel_rx => {
                    info!(job = %id, %operation, "Job cancelled");
                    JobOutcome::Failed(JobFailure::cancelled(operation))
                }
            };

            info!(job = %id, %operation, "Job finished");
            let _ = event_tx.send(JobEvent::Finished { id, operation, outcome });
        });

        JobHandle {
            id,
            operation,
            cancel_tx: Some(cancel_tx),
            join,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{sample_extraction, FailureKind, SimulatedExtractor, SimulatedReportGenerator};
    use crate::wizard::state::FileDescriptor;
    use tokio::sync::mpsc;

    fn runner(latency_ms: u64) -> (JobRunner, mpsc::UnboundedReceiver<JobEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let latency = Duration::from_millis(latency_ms);
        let runner = JobRunner::new(
            Arc::new(SimulatedExtractor::new(latency)),
            Arc::new(SimulatedReportGenerator::new(latency)),
            tx,
        );
        (runner, rx)
    }

    fn request() -> ExtractionRequest {
        ExtractionRequest {
            document: FileDescriptor::new("invoice.pdf", 10),
            query: "totals".to_string(),
        }
    }

    async fn finished(rx: &mut mpsc::UnboundedReceiver<JobEvent>) -> (JobId, JobOutcome) {
        loop {
            if let Some(JobEvent::Finished { id, outcome, .. }) = rx.recv().await {
                return (id, outcome);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_extraction_reports_progress_then_result() {
        let (runner, mut rx) = runner(1000);
        let id = JobId::new();
        let handle = runner.spawn_extraction(id, request());
        assert_eq!(handle.id(), id);
        assert_eq!(handle.operation(), Operation::Extraction);

        let mut progress = Vec::new();
        let outcome = loop {
            match rx.recv().await.unwrap() {
                JobEvent::Progress { progress: p, .. } => progress.push(p),
                JobEvent::Finished { outcome, .. } => break outcome,
            }
        };
        assert_eq!(progress.len(), 10);
        assert_eq!(progress.last().copied(), Some(1.0));
        assert_eq!(outcome, JobOutcome::Extracted(sample_extraction()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_job() {
        let (runner, mut rx) = runner(1000);
        let runner = runner.with_timeouts(Duration::from_millis(200), Duration::from_millis(200));
        let id = JobId::new();
        let _handle = runner.spawn_extraction(id, request());

        let (finished_id, outcome) = finished(&mut rx).await;
        assert_eq!(finished_id, id);
        match outcome {
            JobOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::TimedOut { after_ms: 200 })
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let (runner, mut rx) = runner(1000);
        let mut handle = runner.spawn_extraction(JobId::new(), request());
        handle.cancel();
        handle.cancel();

        let (_, outcome) = finished(&mut rx).await;
        assert!(matches!(
            outcome,
            JobOutcome::Failed(JobFailure {
                kind: FailureKind::Cancelled,
                ..
            })
        ));
        tokio::task::yield_now().await;
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_does_not_cancel() {
        let (runner, mut rx) = runner(100);
        drop(runner.spawn_extraction(JobId::new(), request()));

        let (_, outcome) = finished(&mut rx).await;
        assert!(matches!(outcome, JobOutcome::Extracted(_)));
    }
}
