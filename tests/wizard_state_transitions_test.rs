use docassist::jobs::{sample_extraction, sample_report, FailureKind, JobFailure, JobId, Operation};
use docassist::wizard::{Action, Effect, FileDescriptor, Notice, Step, WizardState};
use docassist::DocAssistError;
use pretty_assertions::assert_eq;

fn at_query() -> WizardState {
    WizardState::new()
        .apply(Action::SelectFile(FileDescriptor::new("q3-deals.pdf", 2_400_000)))
        .unwrap()
        .state
}

fn extracting(query: &str) -> (WizardState, JobId) {
    let state = at_query()
        .apply(Action::EditQuery(query.to_string()))
        .unwrap()
        .state;
    let transition = state.apply(Action::SubmitQuery).unwrap();
    let id = transition.state.pending_job.expect("extraction should be pending");
    (transition.state, id)
}

fn at_preview() -> WizardState {
    let (state, id) = extracting("company names and revenue");
    state
        .apply(Action::ExtractionSucceeded {
            id,
            result: sample_extraction(),
        })
        .unwrap()
        .state
}

fn generating() -> (WizardState, JobId) {
    let transition = at_preview().apply(Action::RequestReport).unwrap();
    let id = transition.state.pending_job.expect("report should be pending");
    (transition.state, id)
}

#[test]
fn test_initial_state() {
    let state = WizardState::new();
    assert_eq!(state.step, Step::AwaitUpload);
    assert!(state.file.is_none());
    assert_eq!(state.query, "");
    assert!(!state.is_busy());
    assert!(state.extraction.is_none());
    assert!(state.report.is_none());
}

#[test]
fn test_select_file_advances_to_query() {
    let state = at_query();
    assert_eq!(state.step, Step::AwaitQuery);
    let file = state.file.as_ref().unwrap();
    assert_eq!(file.name, "q3-deals.pdf");
    assert_eq!(file.display_size(), "2.29 MB");
}

#[test]
fn test_blank_query_cannot_be_submitted() {
    for query in ["", "   ", "\n\t "] {
        let state = at_query().apply(Action::EditQuery(query.to_string())).unwrap().state;
        assert!(!state.can_submit_query());
        let err = state.apply(Action::SubmitQuery).unwrap_err();
        assert!(matches!(err, DocAssistError::EmptyQuery), "query {:?}", query);
    }
}

#[test]
fn test_submit_starts_exactly_one_extraction() {
    let state = at_query()
        .apply(Action::EditQuery("all dates".to_string()))
        .unwrap()
        .state;
    let transition = state.apply(Action::SubmitQuery).unwrap();

    assert_eq!(transition.state.step, Step::Extracting);
    assert!(transition.state.is_busy());
    assert_eq!(transition.effects.len(), 1);
    match &transition.effects[0] {
        Effect::StartExtraction { id, request } => {
            assert_eq!(Some(*id), transition.state.pending_job);
            assert_eq!(request.document.name, "q3-deals.pdf");
            assert_eq!(request.query, "all dates");
        }
        other => panic!("Expected StartExtraction, got {:?}", other),
    }

    // A second submit is rejected once the step has moved on
    assert!(matches!(
        transition.state.apply(Action::SubmitQuery),
        Err(DocAssistError::InvalidTransition { step: Step::Extracting, .. })
    ));
}

#[test]
fn test_extraction_result_leads_to_preview() {
    let state = at_preview();
    assert_eq!(state.step, Step::PreviewReady);
    assert!(!state.is_busy());

    let extraction = state.extraction.as_ref().unwrap();
    assert_eq!(extraction.row_count, 15);
    assert_eq!(extraction.columns, vec!["Company", "Revenue", "Date", "Status"]);
    assert_eq!(extraction.preview_rows.len(), 3);
    assert_eq!(extraction.preview_rows[0][0], "Acme Corp");
}

#[test]
fn test_report_generation_keeps_step_five() {
    let (state, id) = generating();
    assert_eq!(state.step, Step::ReportReady);
    assert!(!state.report_ready());

    let state = state
        .apply(Action::ReportSucceeded {
            id,
            report: sample_report(),
        })
        .unwrap()
        .state;
    assert_eq!(state.step, Step::ReportReady);
    assert!(state.report_ready());
    assert!(!state.is_busy());
    assert_eq!(state.report.as_ref().unwrap().metric("Total Revenue"), Some("$12.4M"));
}

#[test]
fn test_out_of_order_actions_are_rejected() {
    let fresh = WizardState::new();
    for action in [
        Action::SubmitQuery,
        Action::RequestReport,
        Action::DownloadSpreadsheet,
        Action::DownloadReport,
        Action::Retry,
        Action::Cancel,
        Action::EditQuery("too early".to_string()),
    ] {
        let name = action.name();
        assert!(
            matches!(fresh.apply(action), Err(DocAssistError::InvalidTransition { .. })),
            "{} should be rejected at step 1",
            name
        );
    }

    // A file cannot be chosen twice
    assert!(at_query()
        .apply(Action::SelectFile(FileDescriptor::new("other.pdf", 1)))
        .is_err());
}

#[test]
fn test_step_never_decreases() {
    let (extracting_state, id) = extracting("revenue");
    let failed = extracting_state
        .apply(Action::JobFailed {
            id,
            failure: JobFailure::failed(Operation::Extraction, "backend unavailable"),
        })
        .unwrap()
        .state;
    assert_eq!(failed.step, Step::Extracting);

    let (report_state, _) = generating();
    let cancelled = report_state.apply(Action::Cancel).unwrap().state;
    assert_eq!(cancelled.step, Step::ReportReady);
    assert!(cancelled.report.is_none());

    let stale = report_state.apply(Action::ReportSucceeded {
        id: JobId::new(),
        report: sample_report(),
    });
    assert!(matches!(stale, Err(DocAssistError::StaleJob(_))));
}

#[test]
fn test_downloads_only_notify() {
    let preview = at_preview();
    let transition = preview.apply(Action::DownloadSpreadsheet).unwrap();
    assert_eq!(transition.state, preview);
    assert_eq!(
        transition.effects,
        vec![Effect::Notify(Notice::new("Download Excel", "Excel file downloaded!"))]
    );

    // The full report is only downloadable once it exists
    assert!(preview.apply(Action::DownloadReport).is_err());
    let (state, id) = generating();
    assert!(state.apply(Action::DownloadReport).is_err());

    let done = state
        .apply(Action::ReportSucceeded {
            id,
            report: sample_report(),
        })
        .unwrap()
        .state;
    let transition = done.apply(Action::DownloadReport).unwrap();
    assert_eq!(transition.state, done);
    assert_eq!(
        transition.effects,
        vec![Effect::Notify(Notice::new("Download Full Report", "Report downloaded!"))]
    );
}

#[test]
fn test_retry_after_failure_starts_new_job() {
    let (state, id) = extracting("revenue");
    let failed = state
        .apply(Action::JobFailed {
            id,
            failure: JobFailure::timed_out(Operation::Extraction, std::time::Duration::from_millis(500)),
        })
        .unwrap()
        .state;
    assert!(failed.can_retry());
    assert!(matches!(
        failed.failure.as_ref().unwrap().kind,
        FailureKind::TimedOut { after_ms: 500 }
    ));

    let transition = failed.apply(Action::Retry).unwrap();
    let new_id = transition.state.pending_job.unwrap();
    assert_ne!(new_id, id);
    assert!(transition.state.failure.is_none());
    assert!(matches!(
        &transition.effects[..],
        [Effect::StartExtraction { id, .. }] if *id == new_id
    ));

    // Retry is refused while a job is in flight
    assert!(transition.state.apply(Action::Retry).is_err());
}

#[test]
fn test_cancel_discards_late_completion() {
    let (state, id) = extracting("revenue");
    let transition = state.apply(Action::Cancel).unwrap();
    assert_eq!(transition.effects, vec![Effect::CancelJob(id)]);

    let cancelled = transition.state;
    assert!(!cancelled.is_busy());
    assert_eq!(cancelled.failure.as_ref().unwrap().kind, FailureKind::Cancelled);

    let late = cancelled.apply(Action::ExtractionSucceeded {
        id,
        result: sample_extraction(),
    });
    assert!(matches!(late, Err(DocAssistError::StaleJob(stale)) if stale == id));
}

#[test]
fn test_report_request_refused_while_generating() {
    let (state, _) = generating();
    assert!(state.apply(Action::RequestReport).is_err());
}
