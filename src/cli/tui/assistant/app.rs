use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Direction, Layout},
    text::Span,
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time;
use tracing::{debug, warn};
use tui_input::backend::crossterm::EventHandler;

use super::events::AppEvent;
use super::modal::render_notice_modal;
use super::screens::{self, ScreenContext};
use super::state::ViewState;
use super::theme::Theme;
use crate::jobs::JobEvent;
use crate::wizard::{Action, Notice, Step, WizardController};
use crate::Result;

/// Main application struct
pub struct App {
    /// Wizard snapshot plus the job runner
    controller: WizardController,
    /// Text inputs, modal and spinner
    view: ViewState,
    /// Whether the app should quit
    should_quit: bool,
    /// Theme for styling
    theme: Theme,
    /// Last time Ctrl+C was pressed, for double-press exit
    last_ctrl_c: Option<Instant>,
}

impl App {
    pub fn new(controller: WizardController) -> Self {
        Self {
            controller,
            view: ViewState::default(),
            should_quit: false,
            theme: Theme::default(),
            last_ctrl_c: None,
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the application until the user quits
    pub async fn run(mut self, mut job_rx: UnboundedReceiver<JobEvent>) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        // Terminal input is read on a plain thread so shutdown never waits on a
        // blocking read
        spawn_input_reader(event_tx.clone());

        // Job events are forwarded into the same queue
        let job_tx = event_tx;
        tokio::spawn(async move {
            while let Some(event) = job_rx.recv().await {
                if job_tx.send(AppEvent::Job(event)).is_err() {
                    break;
                }
            }
        });

        let result = self.main_loop(&mut terminal, &mut event_rx).await;

        // Cleanup
        ratatui::restore();
        result
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        event_rx: &mut UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            // Handle events with timeout for animations
            match time::timeout(Duration::from_millis(50), event_rx.recv()).await {
                Ok(Some(event)) => self.handle_event(event)?,
                Ok(None) => break, // Channel closed
                Err(_) => self.handle_event(AppEvent::Tick)?,
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the header, step indicator, current screen and help bar
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Step indicator
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let accept_filter = self.controller.upload_settings().accept_filter();
        let ctx = ScreenContext {
            state: self.controller.state(),
            view: &self.view,
            progress: self.controller.progress(),
            accept_filter: &accept_filter,
            theme: &self.theme,
        };

        screens::render_header(frame, chunks[0], &self.theme);
        screens::render_stepper(frame, chunks[1], ctx.state, &self.theme);
        screens::render_body(frame, chunks[2], &ctx);

        // Steps 1 and 2 show errors next to their inputs
        if ctx.state.step >= Step::Extracting {
            if let Some(error) = &self.view.error {
                frame.render_widget(
                    Paragraph::new(Span::styled(error.clone(), self.theme.error)),
                    chunks[3],
                );
            }
        }
        screens::render_help(frame, chunks[4], screens::help_line(&ctx), &self.theme);

        if let Some(notice) = &self.view.notice {
            render_notice_modal(frame, frame.area(), notice);
        }
    }

    /// Handle one event
    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => {
                self.handle_key(key);
                Ok(())
            }
            AppEvent::Job(job_event) => {
                if let Err(e) = self.controller.handle_job_event(job_event) {
                    warn!("Job event rejected: {}", e);
                    self.view.error = Some(e.to_string());
                }
                Ok(())
            }
            AppEvent::Tick => {
                self.view.tick = self.view.tick.wrapping_add(1);
                Ok(())
            }
            AppEvent::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
                Ok(())
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            // Exit on double press
            let now = Instant::now();
            if let Some(last) = self.last_ctrl_c {
                if now.duration_since(last).as_millis() < 1000 {
                    self.should_quit = true;
                    return;
                }
            }
            self.last_ctrl_c = Some(now);
            return;
        }

        // An open notice swallows the key that dismisses it
        if self.view.dismiss_notice() {
            return;
        }

        match self.controller.state().step {
            Step::AwaitUpload => self.handle_upload_key(key),
            Step::AwaitQuery => self.handle_query_key(key),
            Step::Extracting => self.handle_extracting_key(key),
            Step::PreviewReady => self.handle_preview_key(key),
            Step::ReportReady => self.handle_report_key(key),
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => {
                let raw = self.view.path_input.value().trim().to_string();
                if raw.is_empty() {
                    self.view.error = Some("Enter the path of a document".to_string());
                    return;
                }
                match self.controller.select_path(Path::new(&raw)) {
                    Ok(notices) => {
                        self.view.error = None;
                        self.show_notices(notices);
                    }
                    Err(e) => {
                        warn!(path = %raw, "File rejected: {}", e);
                        self.view.error = Some(e.to_string());
                    }
                }
            }
            _ => {
                self.view.path_input.handle_event(&Event::Key(key));
                self.view.error = None;
            }
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => {
                if self.controller.state().can_submit_query() {
                    self.perform(Action::SubmitQuery);
                }
            }
            _ => {
                self.view.query_input.handle_event(&Event::Key(key));
                let text = self.view.query_input.value().to_string();
                if text != self.controller.state().query {
                    self.view.error = None;
                    self.perform(Action::EditQuery(text));
                }
            }
        }
    }

    fn handle_extracting_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Esc if self.controller.state().is_busy() => self.perform(Action::Cancel),
            KeyCode::Char('r') | KeyCode::Char('R') if self.controller.state().can_retry() => {
                self.perform(Action::Retry)
            }
            _ => {}
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('d') | KeyCode::Char('D') => self.perform(Action::DownloadSpreadsheet),
            KeyCode::Char('g') | KeyCode::Char('G') | KeyCode::Enter => {
                self.perform(Action::RequestReport)
            }
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent) {
        let report_ready = self.controller.state().report_ready();
        let busy = self.controller.state().is_busy();
        let can_retry = self.controller.state().can_retry();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('d') | KeyCode::Char('D') if report_ready => self.perform(Action::DownloadReport),
            KeyCode::Char('x') | KeyCode::Char('X') => self.perform(Action::DownloadSpreadsheet),
            KeyCode::Esc if busy => self.perform(Action::Cancel),
            KeyCode::Char('r') | KeyCode::Char('R') if can_retry => self.perform(Action::Retry),
            _ => {}
        }
    }

    /// Dispatch a user action, surfacing notices and rejections
    fn perform(&mut self, action: Action) {
        match self.controller.dispatch(action) {
            Ok(notices) => {
                self.view.error = None;
                self.show_notices(notices);
            }
            Err(e) => {
                warn!("Action rejected: {}", e);
                self.view.error = Some(e.to_string());
            }
        }
    }

    fn show_notices(&mut self, notices: Vec<Notice>) {
        if let Some(notice) = notices.into_iter().last() {
            self.view.show_notice(notice);
        }
    }
}

/// Forward key presses and resizes until the app stops listening
fn spawn_input_reader(tx: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Terminal input failed: {}", e);
                    break;
                }
            }

            let sent = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(AppEvent::Key(key)),
                Ok(Event::Resize(width, height)) => tx.send(AppEvent::Resize(width, height)),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!("Terminal input failed: {}", e);
                    break;
                }
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
