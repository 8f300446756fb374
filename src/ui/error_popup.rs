use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

/// A dismissible centered popup with the full text of a failed load.
pub struct ErrorPopup<'a> {
    text: &'a str,
}

impl<'a> ErrorPopup<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for ErrorPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let panel = popup_rect(self.text, area);
        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Request failed ")
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(panel);
        block.render(panel, buf);

        // Last inner line is reserved for the dismiss hint.
        if inner.height < 2 {
            return;
        }
        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);

        Paragraph::new(self.text)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        let hint = Line::from(Span::styled(
            " Press Esc or Enter to dismiss ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}

/// Size the panel to the wrapped text, capped at 70 columns and 3/5 height.
fn popup_rect(text: &str, area: Rect) -> Rect {
    let width = 70u16.min(area.width.saturating_sub(4));
    let inner_width = width.saturating_sub(2) as usize;

    let text_lines: usize = text
        .lines()
        .map(|line| {
            let len = line.chars().count();
            if len == 0 || inner_width == 0 {
                1
            } else {
                len.div_ceil(inner_width)
            }
        })
        .sum::<usize>()
        .max(1);

    // Borders (2) + blank line + hint line.
    let wanted = u16::try_from(text_lines).unwrap_or(u16::MAX).saturating_add(4);
    let height = wanted
        .min((area.height * 3 / 5).max(8))
        .min(area.height.saturating_sub(2));

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::popup_rect;
    use ratatui::layout::Rect;

    #[test]
    fn short_message_gets_small_centered_panel() {
        let rect = popup_rect("not found", Rect::new(0, 0, 100, 40));
        assert_eq!(rect.width, 70);
        assert_eq!(rect.height, 5);
        assert_eq!(rect.x, 15);
    }

    #[test]
    fn long_message_is_capped() {
        let text = "x".repeat(10_000);
        let rect = popup_rect(&text, Rect::new(0, 0, 80, 30));
        assert_eq!(rect.height, 18);
    }
}
