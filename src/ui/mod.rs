pub mod docs_sets;
pub mod markdown;
pub mod widgets;

use crate::app::App;
use crate::state::ProviderState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, state: &ProviderState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Results and detail
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Bottom keymap bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    widgets::render_search_box(frame, app, rows[0]);
    widgets::render_results(frame, app, state, columns[0]);
    widgets::render_detail(frame, app, columns[1]);
    widgets::render_status_bar(frame, app, state, rows[2]);
    widgets::render_bottom_bar(frame, app, rows[3]);

    if app.show_summary && app.selected.is_some() {
        widgets::render_summary_drawer(frame, state, columns[1]);
    }

    if app.show_help {
        widgets::render_help_window(frame, frame.area());
    }
}
