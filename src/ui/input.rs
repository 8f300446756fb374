use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

/// A simple single-line text input renderer.
///
/// Renders the prompt + text content, with a cursor block at the end.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, text: &'a str) -> Self {
        Self {
            prompt,
            text,
            style: Style::default().fg(Color::White),
        }
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let display = format!("{}{}\u{2588}", self.prompt, self.text);
        buf.set_string(
            area.x,
            area.y,
            tail_fitting(&display, area.width as usize),
            self.style,
        );
    }
}

/// The longest suffix of `s` that fits in `width` columns.
fn tail_fitting(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in s.char_indices().rev() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &s[idx + ch.len_utf8()..];
        }
    }
    s
}
