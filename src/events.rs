// Completion events sent from operation tasks back to the UI loop

use crate::api::RequestKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A search finished and the store holds its results
    SearchCompleted { result_count: usize },
    /// The summary stream finished
    SummaryCompleted,
    /// Feedback or an example request was accepted
    Acknowledged { kind: RequestKind, success: bool },
    /// An operation failed with the message recorded in the store
    RequestFailed { kind: RequestKind, message: String },
}

impl AppEvent {
    /// Status line text for this event
    pub fn status_text(&self) -> String {
        match self {
            Self::SearchCompleted { result_count } => {
                format!("Search returned {result_count} results")
            }
            Self::SummaryCompleted => "Summary ready".to_string(),
            Self::Acknowledged { kind, success: true } => format!("{kind} sent"),
            Self::Acknowledged { kind, success: false } => format!("{kind} was not accepted"),
            Self::RequestFailed { kind, message } => format!("{kind} failed: {message}"),
        }
    }
}
