use ratatui::crossterm::event::KeyEvent;

use crate::jobs::JobEvent;

/// All possible events in the application
#[derive(Debug)]
pub enum AppEvent {
    // Input events
    Key(KeyEvent),
    Resize(u16, u16),

    // Extraction and report jobs
    Job(JobEvent),

    // UI events
    Tick, // for the spinner and progress gauge
}
