use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::UnicodeWidthChar;

use crate::model::ItemDetail;
use crate::sync::Phase;
use crate::sync::list::ListSynchronizer;

const NAME_WIDTH: usize = 18;
const TYPES_WIDTH: usize = 18;

/// One page of the catalog, one row per item, with selection highlight.
pub struct ItemListView<'a> {
    pub list: &'a ListSynchronizer,
    pub selected_index: usize,
}

impl<'a> ItemListView<'a> {
    pub fn new(list: &'a ListSynchronizer, selected_index: usize) -> Self {
        Self {
            list,
            selected_index,
        }
    }
}

impl Widget for ItemListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Arrows mark the pagination directions that are enabled.
        let title = if self.list.is_loading() {
            " Pokédex  [loading...] ".to_string()
        } else {
            format!(
                " Pokédex  {} prev  {} next ",
                if self.list.prev_cursor().is_some() { "\u{2190}" } else { "\u{00b7}" },
                if self.list.next_cursor().is_some() { "\u{2192}" } else { "\u{00b7}" },
            )
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        // While loading only the indicator is shown.
        let msg = match self.list.phase() {
            Phase::Loading => Some("Loading..."),
            Phase::Failed(_) if self.list.prev_cursor().is_some() => {
                Some("Could not load this page. Press r to retry or p to go back.")
            }
            Phase::Failed(_) => Some("Could not load this page. Press r to retry."),
            _ if self.list.items().is_empty() => Some("Nothing to display"),
            _ => None,
        };
        if let Some(msg) = msg {
            buf.set_string(
                inner.x + 1,
                inner.y,
                msg,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let items = self.list.items();
        let height = inner.height as usize;
        let start = scroll_start(items.len(), self.selected_index, height);

        for (row, (idx, item)) in items.iter().enumerate().skip(start).take(height).enumerate() {
            let line = item_line(item, idx == self.selected_index);
            buf.set_line(
                inner.x + 1,
                inner.y + row as u16,
                &line,
                inner.width.saturating_sub(1),
            );
        }
    }
}

fn item_line(item: &ItemDetail, selected: bool) -> Line<'static> {
    let base = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("#{:<5}", item.id), base.fg(Color::Yellow)),
        Span::styled(pad(&item.name, NAME_WIDTH), base.fg(Color::White)),
        Span::styled(
            pad(&item.categories.join("/"), TYPES_WIDTH),
            base.fg(Color::Green),
        ),
        Span::styled(
            item.image.display().unwrap_or_default(),
            base.fg(Color::DarkGray),
        ),
    ])
}

/// Truncate or right-pad to a display width, plus one column of gap.
fn pad(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used + 1));
    out
}

/// First visible row so that `selected` stays on screen.
fn scroll_start(len: usize, selected: usize, height: usize) -> usize {
    if len == 0 || height == 0 {
        return 0;
    }
    let selected = selected.min(len - 1);
    (selected + 1).saturating_sub(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_start(0, 0, 10), 0);
        assert_eq!(scroll_start(20, 3, 10), 0);
        assert_eq!(scroll_start(20, 9, 10), 0);
        assert_eq!(scroll_start(20, 10, 10), 1);
        assert_eq!(scroll_start(20, 99, 10), 10);
    }

    #[test]
    fn pad_truncates_and_fills() {
        assert_eq!(pad("pikachu", 10), "pikachu    ");
        assert_eq!(pad("fletchinder-long", 5), "fletc ");
        assert_eq!(pad("ポケモン", 5), "ポケ  ");
    }
}
