//! Key handling of the interactive assistant, driven without a terminal

use std::path::PathBuf;

use docassist::cli::tui::assistant::app::App;
use docassist::cli::tui::assistant::events::AppEvent;
use docassist::config::AppConfig;
use docassist::jobs::JobEvent;
use docassist::wizard::{Step, WizardController};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_event(key(KeyCode::Char(c))).unwrap();
    }
}

fn new_app() -> (App, UnboundedReceiver<JobEvent>) {
    let (controller, rx) = WizardController::simulated(&AppConfig::default());
    (App::new(controller), rx)
}

fn document(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("contracts.pdf");
    std::fs::write(&path, b"%PDF-1.7").unwrap();
    path
}

/// Feed job events to the app until nothing is pending
async fn drain_jobs(app: &mut App, rx: &mut UnboundedReceiver<JobEvent>) {
    while app.controller().state().is_busy() {
        let event = rx.recv().await.unwrap();
        app.handle_event(AppEvent::Job(event)).unwrap();
    }
}

async fn app_at_preview(dir: &TempDir) -> (App, UnboundedReceiver<JobEvent>) {
    let (mut app, mut rx) = new_app();
    type_text(&mut app, document(dir).to_str().unwrap());
    app.handle_event(key(KeyCode::Enter)).unwrap();
    type_text(&mut app, "company names");
    app.handle_event(key(KeyCode::Enter)).unwrap();
    drain_jobs(&mut app, &mut rx).await;
    assert_eq!(app.controller().state().step, Step::PreviewReady);
    (app, rx)
}

#[test]
fn test_upload_with_missing_path_shows_error() {
    let (mut app, _rx) = new_app();
    type_text(&mut app, "/definitely/not/here.pdf");
    app.handle_event(key(KeyCode::Enter)).unwrap();

    assert_eq!(app.controller().state().step, Step::AwaitUpload);
    assert!(app.view().error.as_ref().unwrap().contains("Invalid file"));

    // Typing again clears the error
    app.handle_event(key(KeyCode::Backspace)).unwrap();
    assert!(app.view().error.is_none());
}

#[test]
fn test_empty_path_is_refused() {
    let (mut app, _rx) = new_app();
    app.handle_event(key(KeyCode::Enter)).unwrap();
    assert_eq!(app.controller().state().step, Step::AwaitUpload);
    assert!(app.view().error.is_some());
}

#[test]
fn test_esc_quits_on_upload() {
    let (mut app, _rx) = new_app();
    app.handle_event(key(KeyCode::Esc)).unwrap();
    assert!(app.should_quit());
}

#[test]
fn test_query_input_tracks_wizard_query() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = new_app();
    type_text(&mut app, document(&dir).to_str().unwrap());
    app.handle_event(key(KeyCode::Enter)).unwrap();
    assert_eq!(app.controller().state().step, Step::AwaitQuery);

    // Blank query: Enter does nothing
    app.handle_event(key(KeyCode::Enter)).unwrap();
    assert_eq!(app.controller().state().step, Step::AwaitQuery);

    // 'q' is text here, not quit
    type_text(&mut app, "quarterly revenue");
    assert!(!app.should_quit());
    assert_eq!(app.controller().state().query, "quarterly revenue");
    assert!(app.controller().state().can_submit_query());
}

#[tokio::test(start_paused = true)]
async fn test_full_flow_through_report() {
    let dir = TempDir::new().unwrap();
    let (mut app, mut rx) = app_at_preview(&dir).await;

    app.handle_event(key(KeyCode::Char('g'))).unwrap();
    assert_eq!(app.controller().state().step, Step::ReportReady);
    assert!(app.controller().state().is_busy());

    drain_jobs(&mut app, &mut rx).await;
    assert!(app.controller().state().report_ready());

    app.handle_event(key(KeyCode::Char('d'))).unwrap();
    assert_eq!(app.view().notice.as_ref().unwrap().message, "Report downloaded!");

    // Any key closes the notice without acting on it
    app.handle_event(key(KeyCode::Char('q'))).unwrap();
    assert!(app.view().notice.is_none());
    assert!(!app.should_quit());

    app.handle_event(key(KeyCode::Char('q'))).unwrap();
    assert!(app.should_quit());
}

#[tokio::test(start_paused = true)]
async fn test_download_excel_from_preview() {
    let dir = TempDir::new().unwrap();
    let (mut app, _rx) = app_at_preview(&dir).await;

    app.handle_event(key(KeyCode::Char('d'))).unwrap();
    let notice = app.view().notice.clone().unwrap();
    assert_eq!(notice.title, "Download Excel");
    assert_eq!(notice.message, "Excel file downloaded!");
    assert_eq!(app.controller().state().step, Step::PreviewReady);
}

#[tokio::test(start_paused = true)]
async fn test_esc_cancels_extraction_and_r_retries() {
    let dir = TempDir::new().unwrap();
    let (mut app, mut rx) = new_app();
    type_text(&mut app, document(&dir).to_str().unwrap());
    app.handle_event(key(KeyCode::Enter)).unwrap();
    type_text(&mut app, "dates");
    app.handle_event(key(KeyCode::Enter)).unwrap();
    assert_eq!(app.controller().state().step, Step::Extracting);

    app.handle_event(key(KeyCode::Esc)).unwrap();
    assert!(!app.controller().state().is_busy());
    assert!(app.controller().state().can_retry());
    assert!(!app.should_quit());

    app.handle_event(key(KeyCode::Char('r'))).unwrap();
    assert!(app.controller().state().is_busy());
    drain_jobs(&mut app, &mut rx).await;
    assert_eq!(app.controller().state().step, Step::PreviewReady);
}

#[test]
fn test_double_ctrl_c_quits() {
    let (mut app, _rx) = new_app();
    let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    app.handle_event(ctrl_c).unwrap();
    assert!(!app.should_quit());
    // Not typed into the path input
    assert_eq!(app.view().path_input.value(), "");

    let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    app.handle_event(ctrl_c).unwrap();
    assert!(app.should_quit());
}

#[test]
fn test_tick_advances_spinner() {
    let (mut app, _rx) = new_app();
    for _ in 0..4 {
        app.handle_event(AppEvent::Tick).unwrap();
    }
    assert_eq!(app.view().tick, 4);
}
