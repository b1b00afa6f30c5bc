use tui_input::Input;

use crate::wizard::Notice;

/// Frames of the busy spinner
pub const SPINNER_FRAMES: [&str; 6] = ["⟳", "⟲", "⟴", "⟵", "⟶", "⟷"];

/// UI-only state that the wizard snapshot does not carry
#[derive(Debug, Default)]
pub struct ViewState {
    /// Path typed at step 1
    pub path_input: Input,
    /// Query typed at step 2
    pub query_input: Input,
    /// Notice shown in a modal until dismissed
    pub notice: Option<Notice>,
    /// Last rejected input, shown under the active control
    pub error: Option<String>,
    pub tick: usize,
}

impl ViewState {
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[(self.tick / 4) % SPINNER_FRAMES.len()]
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }
}
