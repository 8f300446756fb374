use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::api::ErrorKind;
use crate::model::Artwork;
use crate::sync::Phase;
use crate::sync::detail::{DetailSynchronizer, DetailView};

/// Single item view: stats on top, related items of the same type below.
pub struct DetailPane<'a> {
    pub identifier: &'a str,
    pub detail: &'a DetailSynchronizer,
    pub selected_index: usize,
}

impl<'a> DetailPane<'a> {
    pub fn new(identifier: &'a str, detail: &'a DetailSynchronizer, selected_index: usize) -> Self {
        Self {
            identifier,
            detail,
            selected_index,
        }
    }
}

impl Widget for DetailPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .detail
            .view()
            .map(|v| v.item.name.as_str())
            .or(self.detail.identifier())
            .unwrap_or(self.identifier)
            .to_string();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let view = match (self.detail.phase(), self.detail.view()) {
            (Phase::Ready, Some(view)) => view,
            (Phase::Failed(f), _) if f.kind == ErrorKind::NotFound => {
                let msg = format!("No item called \"{}\"", self.identifier);
                buf.set_string(inner.x + 1, inner.y, msg, Style::default().fg(Color::Red));
                return;
            }
            (Phase::Failed(_), _) => {
                buf.set_string(
                    inner.x + 1,
                    inner.y,
                    "Could not load this item. Press r to retry.",
                    Style::default().fg(Color::Red),
                );
                return;
            }
            _ => {
                buf.set_string(inner.x + 1, inner.y, "Loading...", dim);
                return;
            }
        };

        let [stats_area, related_area] =
            Layout::vertical([Constraint::Length(6), Constraint::Min(1)]).areas(inner);

        Paragraph::new(stat_lines(view)).render(stats_area, buf);

        // Items without a type have no related section at all.
        if !view.shows_related() {
            return;
        }

        let related_title = format!(
            " More {} types ",
            view.item.primary_category().unwrap_or_default()
        );
        let related_block = Block::default()
            .borders(Borders::TOP)
            .title(related_title)
            .title_style(dim)
            .border_style(dim);
        let related_inner = related_block.inner(related_area);
        related_block.render(related_area, buf);

        if view.related.is_empty() {
            buf.set_string(related_inner.x + 1, related_inner.y, "None", dim);
            return;
        }

        let lines: Vec<Line<'_>> = view
            .related
            .iter()
            .enumerate()
            .map(|(idx, related)| {
                let style = if idx == self.selected_index {
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(format!(" {} ", related.name), style))
            })
            .collect();
        Paragraph::new(lines).render(related_inner, buf);
    }
}

fn stat_lines(view: &DetailView) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let item = &view.item;

    let artwork = match &item.image {
        Artwork::DreamWorld(url) => Span::styled(url.clone(), Style::default().fg(Color::Blue)),
        // Legacy fallback: the ordinal stands where a picture would be.
        Artwork::Ordinal(order) => Span::styled(format!("{order} (no artwork)"), label),
        Artwork::Missing => Span::styled("none", label),
    };

    vec![
        Line::from(vec![
            Span::styled(format!("#{}", item.id), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(item.name.clone(), value),
        ]),
        Line::from(vec![
            Span::styled("Types   ", label),
            Span::styled(item.categories.join(", "), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Height  ", label),
            Span::styled(format_height(item.height), value),
        ]),
        Line::from(vec![
            Span::styled("Weight  ", label),
            Span::styled(format_weight(item.weight), value),
        ]),
        Line::from(vec![Span::styled("Artwork ", label), artwork]),
    ]
}

/// The service reports height in decimetres.
fn format_height(dm: u32) -> String {
    format!("{:.1} m", f64::from(dm) / 10.0)
}

/// The service reports weight in hectograms.
fn format_weight(hg: u32) -> String {
    format!("{:.1} kg", f64::from(hg) / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(format_height(7), "0.7 m");
        assert_eq!(format_weight(69), "6.9 kg");
        assert_eq!(format_weight(9999), "999.9 kg");
    }
}
