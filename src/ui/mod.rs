pub mod command_bar;
pub mod detail;
pub mod error_popup;
pub mod help;
pub mod input;
pub mod list;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::api::Catalog;
use crate::app::{App, AppMode};
use crate::event::ViewKind;

use command_bar::CommandBar;
use detail::DetailPane;
use error_popup::ErrorPopup;
use help::HelpView;
use list::ItemListView;
use status_bar::StatusBar;

pub fn draw<C: Catalog + 'static>(frame: &mut Frame, app: &App<C>) {
    let area = frame.area();

    // Layout: main content + status bar + optional search bar
    let bottom_height = if app.mode != AppMode::Normal { 2 } else { 1 };

    let [main_area, bottom_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(bottom_height)]).areas(area);

    if app.mode != AppMode::Normal {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app), status_area);
        frame.render_widget(CommandBar::new(&app.mode, &app.search_input), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app), bottom_area);
    }

    match app.current_view() {
        Some(ViewKind::Help) => {
            // Render the view underneath first, then overlay help.
            render_content_view(frame, app, main_area);
            frame.render_widget(HelpView::new(), main_area);
        }
        _ => render_content_view(frame, app, main_area),
    }

    // Error detail popup overlay (renders on top of everything)
    if let Some(ref detail) = app.error_detail {
        frame.render_widget(ErrorPopup::new(detail), frame.area());
    }
}

fn render_content_view<C: Catalog + 'static>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let selected = app
        .view_stack
        .iter()
        .rev()
        .find(|vs| !matches!(vs.kind, ViewKind::Help))
        .map_or(0, |vs| vs.selected_index);

    match app.content_view() {
        Some(ViewKind::Detail(identifier)) => {
            frame.render_widget(DetailPane::new(identifier, &app.detail, selected), area);
        }
        _ => {
            frame.render_widget(ItemListView::new(&app.list, selected), area);
        }
    }
}
