use serde::{Deserialize, Serialize};

/// Suffix the docs site appends to every page title.
pub const DOCS_TITLE_SUFFIX: &str = " - MongoDB Docs";

/// A single search result: a code snippet plus the page it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeExample {
    pub code: String,
    pub language: String,
    pub category: String,
    pub page_url: String,
    pub page_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl CodeExample {
    /// Page description, treating an empty string as absent
    pub fn description(&self) -> Option<&str> {
        self.page_description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }
}

/// Drop the docs-site suffix from a page title if it ends with one.
pub fn strip_docs_suffix(title: &str) -> &str {
    title.strip_suffix(DOCS_TITLE_SUFFIX).unwrap_or(title)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query_string: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query_string: query.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub code_examples: Vec<CodeExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiSummaryPayload {
    pub code: String,
    pub page_url: String,
}

impl AiSummaryPayload {
    pub fn for_example(example: &CodeExample) -> Self {
        Self {
            code: example.code.clone(),
            page_url: example.page_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiSummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub mock: bool,
    /// Seconds before a request gives up. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

fn default_host() -> String {
    "ask-cal.netlify.app".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            mock: false,
            request_timeout: None,
        }
    }
}
