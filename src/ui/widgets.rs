use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::docs_sets::{display_language, display_name};
use super::markdown;
use crate::app::{App, Focus};
use crate::models::CodeExample;
use crate::state::ProviderState;

const CARD_PREVIEW_LINES: usize = 3;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Search;
    let (text, style) = if app.input_buffer.is_empty() {
        ("Search code examples...", Style::default().fg(Color::Gray))
    } else {
        (
            app.input_buffer.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ask CAL ")
            .border_style(border_style(focused)),
    );

    frame.render_widget(input, area);
}

/// Badge line: language, category and, when known, the project.
pub fn badges(example: &CodeExample) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("[{}]", example.language),
            Style::default().fg(Color::Blue),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", example.category),
            Style::default().fg(Color::Green),
        ),
    ];
    if let Some(project) = &example.project_name {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{}]", display_name(project)),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

/// First few lines of code for a result card.
pub fn code_preview(code: &str, max_lines: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = code
        .lines()
        .take(max_lines)
        .map(|line| {
            Line::from(Span::styled(
                format!("  {line}"),
                Style::default().fg(Color::Green),
            ))
        })
        .collect();

    if code.lines().count() > max_lines {
        lines.push(Line::from(Span::styled(
            "  ...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

/// Code with a right-aligned line-number gutter.
pub fn numbered_code(code: &str) -> Vec<Line<'static>> {
    let total = code.lines().count();
    let width = total.to_string().len();

    code.lines()
        .enumerate()
        .map(|(index, line)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>width$} │ ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(line.to_string(), Style::default().fg(Color::Green)),
            ])
        })
        .collect()
}

fn result_card(example: &CodeExample) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        example.page_title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(code_preview(&example.code, CARD_PREVIEW_LINES));
    lines.push(badges(example));
    lines.push(Line::from(""));
    ListItem::new(Text::from(lines))
}

pub fn render_results(frame: &mut Frame, app: &App, state: &ProviderState, area: Rect) {
    let focused = app.focus == Focus::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.results_header(state.results.len())))
        .border_style(border_style(focused));

    if state.results.is_empty() {
        let message = if state.loading {
            "Searching..."
        } else {
            "Type a query above and press Enter"
        };
        let empty = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state.results.iter().map(result_card).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▌");

    let mut list_state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Example ")
        .border_style(border_style(false));

    let Some(example) = &app.selected else {
        let placeholder = Paragraph::new(Span::styled(
            "Select a result to view it here",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            example.page_title.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            example.page_url.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];

    if let Some(description) = example.description() {
        lines.push(Line::from(""));
        lines.push(Line::from(description.to_string()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("── {} ──", display_language(&example.language)),
        Style::default().fg(Color::DarkGray),
    )));
    lines.extend(numbered_code(&example.code));
    lines.push(Line::from(""));
    if !app.show_summary {
        lines.push(Line::from(Span::styled(
            "✦ Press e to explain this code",
            Style::default().fg(Color::Magenta),
        )));
    }

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

pub fn render_summary_drawer(frame: &mut Frame, state: &ProviderState, area: Rect) {
    let summary = state.ai_summary.as_deref().unwrap_or_default();

    let lines = if state.loading && summary.is_empty() {
        vec![Line::from(Span::styled(
            "Asking the robots...",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        markdown::render_summary(summary)
    };

    let drawer = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" AI Summary ")
                .title_bottom(" Esc to close ")
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(drawer, area);
}

pub fn render_status_bar(frame: &mut Frame, app: &App, state: &ProviderState, area: Rect) {
    let (message, color) = match (&state.api_error, &app.status) {
        (Some(error), _) => (error.as_str(), Color::Red),
        (None, Some(status)) => (status.as_str(), Color::Green),
        (None, None) => ("", Color::Green),
    };

    let mut flags = Vec::new();
    if state.loading {
        flags.push("[Loading...]");
    }
    if app.mock {
        flags.push("[mock]");
    }

    let flags = flags.join(" ");
    #[allow(clippy::cast_possible_truncation)]
    let flags_width = flags.chars().count() as u16;
    let [left_area, right_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(flags_width)])
        .areas(area);

    let left = Paragraph::new(message.to_string()).style(Style::default().fg(color));
    let right = Paragraph::new(flags).alignment(Alignment::Right).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(left, left_area);
    frame.render_widget(right, right_area);
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "Ctrl+C: Quit | Ctrl+H: Help | Tab: Switch Focus | Enter: Search/Select | e: Explain",
            Style::default().fg(Color::DarkGray),
        )
    };

    let bar = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled(
            "Ask CAL - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("General:", bold)),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+C        - Quit application"),
        Line::from("  Tab           - Switch between search and results"),
        Line::from(""),
        Line::from(Span::styled("Search:", bold)),
        Line::from("  Typing        - Edit the query"),
        Line::from("  Enter         - Run the search"),
        Line::from(""),
        Line::from(Span::styled("Results:", bold)),
        Line::from("  Up/Down       - Move between results"),
        Line::from("  Enter         - Show the result in detail"),
        Line::from("  e             - Explain the selected code"),
        Line::from("  c             - Copy the selected code"),
        Line::from("  f             - Report feedback on the selected code"),
        Line::from("  r             - Request an example for this query"),
        Line::from("  Esc           - Close the AI summary"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_width = 60;
    let popup_height = 23;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width.min(area.width),
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}
