mod api;
mod app;
mod clipboard;
mod config;
mod events;
mod models;
mod provider;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use serde_json::{json, Value};
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::RequestKind;
use app::{App, Focus};
use clipboard::CopyToClipboard;
use events::AppEvent;
use models::{AiSummaryPayload, SearchRequest};
use provider::Provider;
use state::ProviderState;

#[derive(Parser)]
#[command(name = "askcal")]
#[command(author, version, about = "Search code examples and ask for AI summaries", long_about = None)]
struct Cli {
    /// Search to run at startup
    query: Option<String>,
    /// Serve canned responses instead of calling the API
    #[arg(long)]
    mock: bool,
    /// Talk to the local dev server
    #[arg(long)]
    local: bool,
}

fn init_tracing() -> Result<()> {
    let log_path = config::get_log_path()?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    // The terminal belongs to the UI, so logs go to a file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let mut config = config::load_config()?;
    if cli.local {
        config.host = api::LOCAL_HOST.to_string();
    }
    let mock = cli.mock || config.mock;

    let provider = Provider::from_config(&config).context("Failed to create API client")?;
    info!(base_url = provider.base_url(), mock, "starting askcal");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(mock);
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    if let Some(query) = cli.query {
        app.input_buffer = query;
        start_search(&mut app, &provider, &tx);
    }

    let res = run_app(&mut terminal, &mut app, &provider, &tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn handle_app_event(app: &mut App, event: AppEvent) {
    match &event {
        AppEvent::SearchCompleted { result_count } => {
            info!(result_count, "search finished");
            app.cursor = 0;
        }
        AppEvent::RequestFailed { kind, message } => {
            warn!(%kind, %message, "operation failed");
        }
        AppEvent::SummaryCompleted | AppEvent::Acknowledged { .. } => {}
    }
    app.set_status(event.status_text());
}

fn start_search(app: &mut App, provider: &Provider, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    let Some(query) = app.submit_query() else {
        return;
    };
    app.status = None;

    let provider = provider.clone();
    let tx = event_tx.clone();
    let mock = app.mock;

    tokio::spawn(async move {
        let event = match provider.search(&SearchRequest::new(query), mock).await {
            Ok(()) => AppEvent::SearchCompleted {
                result_count: provider.store().snapshot().results.len(),
            },
            Err(err) => AppEvent::RequestFailed {
                kind: RequestKind::Search,
                message: err.user_message(),
            },
        };
        let _ = tx.send(event);
    });
}

fn explain_selected(
    app: &mut App,
    provider: &Provider,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let Some(example) = &app.selected else {
        app.set_status("Select a result first");
        return;
    };
    let payload = AiSummaryPayload::for_example(example);
    app.open_summary();

    let provider = provider.clone();
    let tx = event_tx.clone();

    let task = tokio::spawn(async move {
        let event = match provider.get_ai_summary(&payload).await {
            Ok(()) => AppEvent::SummaryCompleted,
            Err(err) => AppEvent::RequestFailed {
                kind: RequestKind::GetAiSummary,
                message: err.user_message(),
            },
        };
        let _ = tx.send(event);
    });
    app.set_summary_task(task);
}

fn copy_selected(app: &mut App) {
    let Some(code) = app.selected_code() else {
        app.set_status("Select a result first");
        return;
    };
    let copied = execute!(io::stdout(), CopyToClipboard(code));
    match copied {
        Ok(()) => app.set_status("Code copied to clipboard"),
        Err(err) => {
            warn!(error = %err, "clipboard copy failed");
            app.set_status("Could not copy code");
        }
    }
}

fn send_acknowledged(
    kind: RequestKind,
    body: Value,
    mock: bool,
    provider: &Provider,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let provider = provider.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let result = if kind == RequestKind::ReportFeedback {
            provider.report_feedback(&body, mock).await
        } else {
            provider.request_example(&body, mock).await
        };
        let event = match result {
            Ok(value) => AppEvent::Acknowledged {
                kind,
                success: value.get("success").and_then(Value::as_bool).unwrap_or(false),
            },
            Err(err) => AppEvent::RequestFailed {
                kind,
                message: err.user_message(),
            },
        };
        let _ = tx.send(event);
    });
}

fn handle_search_keys(
    app: &mut App,
    key: KeyEvent,
    provider: &Provider,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match key.code {
        KeyCode::Enter => start_search(app, provider, event_tx),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_buffer.push(c);
        }
        _ => {}
    }
}

fn handle_results_keys(
    app: &mut App,
    key: KeyEvent,
    provider: &Provider,
    state: &ProviderState,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(state.results.len()),
        KeyCode::Enter => {
            app.select_at_cursor(&state.results);
        }
        KeyCode::Char('e') => explain_selected(app, provider, event_tx),
        KeyCode::Char('c') => copy_selected(app),
        KeyCode::Char('f') => {
            if let Some(example) = &app.selected {
                let body = json!({
                    "queryId": state.search_query_id,
                    "pageUrl": example.page_url,
                });
                send_acknowledged(RequestKind::ReportFeedback, body, app.mock, provider, event_tx);
            } else {
                app.set_status("Select a result first");
            }
        }
        KeyCode::Char('r') => {
            if let Some(query) = &app.submitted_query {
                let body = json!({ "queryString": query });
                send_acknowledged(RequestKind::RequestExample, body, app.mock, provider, event_tx);
            } else {
                app.set_status("Search for something first");
            }
        }
        KeyCode::Char('/') => app.focus = Focus::Search,
        _ => {}
    }
}

fn handle_keyboard_input(
    app: &mut App,
    key: KeyEvent,
    provider: &Provider,
    state: &ProviderState,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => {
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            return;
        }
        KeyCode::Esc if app.exit_pending => {
            app.exit_pending = false;
            return;
        }
        _ if app.exit_pending => {
            // Any other key cancels pending exit
            app.exit_pending = false;
        }
        _ => {}
    }

    match key.code {
        KeyCode::Char('q') if ctrl => app.quit(),
        KeyCode::Char('h') if ctrl => app.toggle_help(),
        KeyCode::Esc => {
            if app.show_help {
                app.show_help = false;
            } else if app.show_summary {
                app.close_summary();
            }
        }
        _ if app.show_help => {}
        KeyCode::Tab => app.toggle_focus(),
        _ => match app.focus {
            Focus::Search => handle_search_keys(app, key, provider, event_tx),
            Focus::Results => handle_results_keys(app, key, provider, state, event_tx),
        },
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    provider: &Provider,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        // Redraw from the store every frame so streamed summaries show up as they arrive
        let state = provider.store().snapshot();
        terminal.draw(|f| ui::render(f, app, &state))?;

        while let Ok(app_event) = event_rx.try_recv() {
            handle_app_event(app, app_event);
        }

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_keyboard_input(app, key, provider, &state, event_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
