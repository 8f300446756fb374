use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::app::AppMode;
use crate::ui::input::TextInput;

/// Search input bar rendered at the bottom while in search mode.
pub struct CommandBar<'a> {
    pub mode: &'a AppMode,
    pub search_input: &'a str,
}

impl<'a> CommandBar<'a> {
    pub fn new(mode: &'a AppMode, search_input: &'a str) -> Self {
        Self { mode, search_input }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.mode {
            AppMode::Search => {
                TextInput::new("name or #: ", self.search_input).render(area, buf);
            }
            AppMode::Normal => {}
        }
    }
}
