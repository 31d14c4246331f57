// Shared provider state and its transitions

use std::sync::{Arc, Mutex, PoisonError};

use crate::models::CodeExample;

pub const SUMMARY_MISSING_MESSAGE: &str = "Failed to fetch AI summary.";

/// Identifies one AI summary request. Higher tickets supersede lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SummaryTicket(pub u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderState {
    /// True while any request is between start and finish
    pub loading: bool,
    pub in_flight: usize,
    pub api_error: Option<String>,
    pub results: Vec<CodeExample>,
    pub search_query_id: Option<String>,
    pub ai_summary: Option<String>,
    /// Ticket of the summary request allowed to write `ai_summary`
    pub summary_ticket: Option<SummaryTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateAction {
    RequestStarted,
    RequestFinished,
    RequestFailed(String),
    SearchCompleted {
        query_id: Option<String>,
        results: Vec<CodeExample>,
    },
    SummaryStarted(SummaryTicket),
    SummaryProgress {
        ticket: SummaryTicket,
        text: String,
    },
    SummaryCompleted {
        ticket: SummaryTicket,
        summary: String,
    },
    SummaryMissing,
}

impl ProviderState {
    pub fn next_summary_ticket(&self) -> SummaryTicket {
        SummaryTicket(self.summary_ticket.map_or(1, |ticket| ticket.0 + 1))
    }

    fn is_current(&self, ticket: SummaryTicket) -> bool {
        self.summary_ticket == Some(ticket)
    }

    pub fn apply(&mut self, action: StateAction) {
        match action {
            StateAction::RequestStarted => {
                self.in_flight += 1;
                self.loading = true;
                self.api_error = None;
            }
            StateAction::RequestFinished => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.loading = self.in_flight > 0;
            }
            StateAction::RequestFailed(message) => {
                self.api_error = Some(message);
            }
            StateAction::SearchCompleted { query_id, results } => {
                self.search_query_id = query_id;
                self.results = results;
            }
            StateAction::SummaryStarted(ticket) => {
                if !matches!(self.summary_ticket, Some(current) if current >= ticket) {
                    self.summary_ticket = Some(ticket);
                    self.ai_summary = Some(String::new());
                }
            }
            StateAction::SummaryProgress { ticket, text } => {
                if self.is_current(ticket) {
                    self.ai_summary = Some(text);
                }
            }
            StateAction::SummaryCompleted { ticket, summary } => {
                if self.is_current(ticket) {
                    self.ai_summary = Some(summary);
                }
            }
            StateAction::SummaryMissing => {
                self.api_error = Some(SUMMARY_MISSING_MESSAGE.to_string());
            }
        }
    }
}

/// Handle to the shared state, cloned into every operation task.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<ProviderState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, action: StateAction) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
    }

    pub fn snapshot(&self) -> ProviderState {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Allocate a ticket and reset the summary in one step.
    pub fn begin_summary(&self) -> SummaryTicket {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let ticket = state.next_summary_ticket();
        state.apply(StateAction::SummaryStarted(ticket));
        ticket
    }
}

/// Counts one request as in flight until finished or dropped, including when
/// the task is aborted. Finishes at most once.
pub struct LoadingGuard<'a> {
    store: &'a Store,
    finished: bool,
}

impl<'a> LoadingGuard<'a> {
    pub fn start(store: &'a Store) -> Self {
        store.dispatch(StateAction::RequestStarted);
        Self {
            store,
            finished: false,
        }
    }

    pub fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.store.dispatch(StateAction::RequestFinished);
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
