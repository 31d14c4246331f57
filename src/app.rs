use crate::models::CodeExample;

use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
}

/// UI-local state of the results view. Shared request state lives in the store.
#[derive(Debug)]
pub struct App {
    pub focus: Focus,
    pub should_quit: bool,
    pub exit_pending: bool,
    pub mock: bool,
    pub input_buffer: String,
    /// Query text of the last submitted search
    pub submitted_query: Option<String>,
    pub cursor: usize,
    pub selected: Option<CodeExample>,
    pub show_summary: bool,
    pub show_help: bool,
    pub status: Option<String>,
    summary_task: Option<JoinHandle<()>>,
}

impl App {
    pub const fn new(mock: bool) -> Self {
        Self {
            focus: Focus::Search,
            should_quit: false,
            exit_pending: false,
            mock,
            input_buffer: String::new(),
            submitted_query: None,
            cursor: 0,
            selected: None,
            show_summary: false,
            show_help: false,
            status: None,
            summary_task: None,
        }
    }

    pub fn quit(&mut self) {
        self.cancel_summary();
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Search,
        };
    }

    /// Take the typed query for submission. Blank input is ignored.
    pub fn submit_query(&mut self) -> Option<String> {
        let query = self.input_buffer.trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.submitted_query = Some(query.clone());
        self.cursor = 0;
        self.focus = Focus::Results;
        Some(query)
    }

    pub const fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, result_count: usize) {
        if result_count > 0 {
            self.cursor = (self.cursor + 1).min(result_count - 1);
        }
    }

    /// Show `example` in the detail pane, replacing whatever was there.
    pub fn selected_code(&self) -> Option<&str> {
        self.selected.as_ref().map(|example| example.code.as_str())
    }

    pub fn select_example(&mut self, example: CodeExample) {
        if self.selected.as_ref() != Some(&example) {
            self.close_summary();
        }
        self.selected = Some(example);
    }

    /// Select the result under the cursor.
    pub fn select_at_cursor(&mut self, results: &[CodeExample]) -> bool {
        let Some(example) = results.get(self.cursor) else {
            return false;
        };
        self.select_example(example.clone());
        true
    }

    pub const fn open_summary(&mut self) {
        self.show_summary = true;
    }

    pub fn close_summary(&mut self) {
        self.show_summary = false;
        self.cancel_summary();
    }

    /// Track the running summary task, aborting the one it replaces.
    pub fn set_summary_task(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.summary_task.replace(task) {
            previous.abort();
        }
    }

    pub fn cancel_summary(&mut self) {
        if let Some(task) = self.summary_task.take() {
            task.abort();
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn results_header(&self, result_count: usize) -> String {
        match &self.submitted_query {
            Some(query) if result_count > 0 => format!("{result_count} results found for {query}"),
            _ => "Search for code examples using the search box".to_string(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(false)
    }
}
