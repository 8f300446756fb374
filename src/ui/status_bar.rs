use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use url::Url;

use crate::api::Catalog;
use crate::app::{App, AppMode};
use crate::event::ViewKind;

/// Bottom status bar showing mode, current view, page and status messages.
pub struct StatusBar<'a, C> {
    pub app: &'a App<C>,
}

impl<'a, C: Catalog + 'static> StatusBar<'a, C> {
    pub fn new(app: &'a App<C>) -> Self {
        Self { app }
    }
}

impl<C: Catalog + 'static> Widget for StatusBar<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = Vec::new();

        // Mode indicator
        let (mode_str, mode_bg) = match self.app.mode {
            AppMode::Normal => (" NORMAL ", Color::Blue),
            AppMode::Search => (" SEARCH ", Color::Yellow),
        };
        spans.push(Span::styled(
            mode_str,
            Style::default()
                .bg(mode_bg)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));

        // Current view
        let view_name = match self.app.content_view() {
            Some(ViewKind::Detail(id)) => format!("Pokémon: {id}"),
            _ => match page_label(self.app.list.cursor(), self.app.config.page_size) {
                Some(label) => format!("Pokédex {label}"),
                None => "Pokédex".to_string(),
            },
        };
        spans.push(Span::styled(view_name, bg_style));

        // Loading indicator
        if self.app.list.is_loading() || self.app.detail.is_loading() {
            spans.push(Span::styled(
                " [loading...]",
                Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            ));
        }

        // Status message (right-aligned)
        if let Some(ref msg) = self.app.status_message {
            let left_width: usize = spans.iter().map(|s| s.width()).sum();
            let msg: String = msg.chars().take(area.width as usize).collect();
            let padding = (area.width as usize).saturating_sub(left_width + msg.chars().count());
            if padding > 0 {
                spans.push(Span::styled(" ".repeat(padding), bg_style));
            }
            spans.push(Span::styled(
                msg,
                Style::default().bg(Color::DarkGray).fg(Color::Red),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// "page N" derived from a listing cursor's `offset`/`limit` query.
fn page_label(cursor: &str, default_limit: u32) -> Option<String> {
    let url = Url::parse(cursor).ok()?;
    let mut offset = 0u32;
    let mut limit = default_limit;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "offset" => offset = value.parse().ok()?,
            "limit" => limit = value.parse().ok()?,
            _ => {}
        }
    }
    if limit == 0 {
        return None;
    }
    Some(format!("page {}", offset / limit + 1))
}
