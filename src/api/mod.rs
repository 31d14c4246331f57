// Ask CAL API: endpoints, request descriptions and errors

pub mod decoder;
pub mod executor;
pub mod mock;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::state::SummaryTicket;

pub const LOCAL_HOST: &str = "localhost";
pub const LOCAL_BASE_URL: &str = "http://localhost:8888";
pub const DEPLOYED_BASE_URL: &str = "https://ask-cal.netlify.app";

pub const SEARCH_PATH: &str = "/.netlify/functions/search";
pub const AI_SUMMARY_PATH: &str = "/.netlify/functions/ai-summary";
pub const FEEDBACK_PATH: &str = "/.netlify/functions/feedback";
pub const REQUEST_EXAMPLE_PATH: &str = "/.netlify/functions/request-example";

/// Pick the local dev server or the deployed site based on the host name.
pub fn base_url_for_host(host: &str) -> &'static str {
    if host == LOCAL_HOST {
        LOCAL_BASE_URL
    } else {
        DEPLOYED_BASE_URL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Search,
    ReportFeedback,
    RequestExample,
    GetAiSummary,
}

impl RequestKind {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Search => SEARCH_PATH,
            Self::ReportFeedback => FEEDBACK_PATH,
            Self::RequestExample => REQUEST_EXAMPLE_PATH,
            Self::GetAiSummary => AI_SUMMARY_PATH,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Search => "search",
            Self::ReportFeedback => "report-feedback",
            Self::RequestExample => "request-example",
            Self::GetAiSummary => "get-ai-summary",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{status_text}")]
    Transport {
        status: StatusCode,
        status_text: String,
    },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("invalid response format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid request type: {0}")]
    InvalidRequestType(RequestKind),
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map_or_else(|| status.as_u16().to_string(), ToString::to_string);
        Self::Transport {
            status,
            status_text,
        }
    }

    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text recorded in the shared error state
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { status_text, .. } => status_text.clone(),
            Self::Network(_) => "Network error. Please try again later.".to_string(),
            Self::Parse(_) => "Invalid response format.".to_string(),
            Self::InvalidRequestType(_) => "Invalid request type".to_string(),
        }
    }
}

/// One POST against a serverless function.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
    pub kind: RequestKind,
    pub ticket: Option<SummaryTicket>,
}

impl ApiRequest {
    pub fn post_json<T: Serialize>(
        base_url: &str,
        kind: RequestKind,
        body: &T,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            url: format!("{base_url}{}", kind.path()),
            method: Method::POST,
            body: Some(serde_json::to_value(body)?),
            kind,
            ticket: None,
        })
    }

    #[must_use]
    pub const fn with_ticket(mut self, ticket: SummaryTicket) -> Self {
        self.ticket = Some(ticket);
        self
    }
}
