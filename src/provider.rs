// Request provider: the four Ask CAL operations over a shared store

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::executor::HttpExecutor;
use crate::api::mock::MockExecutor;
use crate::api::{base_url_for_host, ApiError, ApiRequest, RequestKind};
use crate::models::{
    strip_docs_suffix, AiSummaryPayload, AiSummaryResponse, AppConfig, SearchRequest,
    SearchResponse,
};
use crate::state::{StateAction, Store};

#[derive(Debug, Clone)]
pub struct Provider {
    base_url: String,
    http: HttpExecutor,
    mock: MockExecutor,
    store: Store,
}

impl Provider {
    pub fn new(base_url: impl Into<String>, http: HttpExecutor, mock: MockExecutor) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            mock,
            store: Store::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let http = HttpExecutor::new(config.request_timeout)?;
        Ok(Self::new(
            base_url_for_host(&config.host),
            http,
            MockExecutor::default(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn store(&self) -> &Store {
        &self.store
    }

    async fn dispatch<T: Serialize>(
        &self,
        kind: RequestKind,
        body: &T,
        mock: bool,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::post_json(&self.base_url, kind, body)?;
        if mock {
            self.mock.execute(request, &self.store).await
        } else {
            self.http.execute(request, &self.store).await
        }
    }

    /// Search for code examples and replace the shared results.
    pub async fn search(&self, body: &SearchRequest, mock: bool) -> Result<(), ApiError> {
        let data = self.dispatch(RequestKind::Search, body, mock).await?;
        let response = self.decode::<SearchResponse>(data)?;

        let results = response
            .code_examples
            .into_iter()
            .map(|mut example| {
                example.page_title = strip_docs_suffix(&example.page_title).to_string();
                example
            })
            .collect::<Vec<_>>();

        info!(count = results.len(), query_id = ?response.query_id, "search results received");
        self.store.dispatch(StateAction::SearchCompleted {
            query_id: response.query_id,
            results,
        });
        Ok(())
    }

    /// Stream an AI summary of one code example into the shared state.
    pub async fn get_ai_summary(&self, payload: &AiSummaryPayload) -> Result<(), ApiError> {
        let ticket = self.store.begin_summary();
        let request = ApiRequest::post_json(&self.base_url, RequestKind::GetAiSummary, payload)?
            .with_ticket(ticket);

        let data = self.http.execute(request, &self.store).await?;
        if data.is_null() {
            warn!("ai summary response had no body");
            self.store.dispatch(StateAction::SummaryMissing);
            return Ok(());
        }

        let response = self.decode::<AiSummaryResponse>(data)?;
        info!(len = response.summary.len(), "ai summary received");
        self.store.dispatch(StateAction::SummaryCompleted {
            ticket,
            summary: response.summary,
        });
        Ok(())
    }

    pub async fn report_feedback(&self, body: &Value, mock: bool) -> Result<Value, ApiError> {
        self.dispatch(RequestKind::ReportFeedback, body, mock).await
    }

    pub async fn request_example(&self, body: &Value, mock: bool) -> Result<Value, ApiError> {
        self.dispatch(RequestKind::RequestExample, body, mock).await
    }

    /// Shape a JSON payload into `T`, recording a parse failure like the executor does.
    fn decode<T: serde::de::DeserializeOwned>(&self, data: Value) -> Result<T, ApiError> {
        serde_json::from_value(data).map_err(|err| {
            let err = ApiError::from(err);
            self.store.dispatch(StateAction::RequestFailed(err.user_message()));
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AI_SUMMARY_PATH, FEEDBACK_PATH, REQUEST_EXAMPLE_PATH, SEARCH_PATH};
    use crate::state::SUMMARY_MISSING_MESSAGE;
    use serde_json::json;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> Provider {
        Provider::new(
            base_url,
            HttpExecutor::new(None).unwrap(),
            MockExecutor::new(Duration::ZERO),
        )
    }

    fn example_json(title: &str) -> Value {
        json!({
            "code": "collection.findOneAndUpdate(filter, update);",
            "language": "java",
            "category": "Usage example",
            "pageUrl": "https://mongodb.com/docs/compound-operations",
            "pageTitle": title,
        })
    }

    #[test]
    fn test_from_config_selects_base_url() {
        let local = AppConfig {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Provider::from_config(&local).unwrap().base_url(),
            "http://localhost:8888"
        );
        assert_eq!(
            Provider::from_config(&AppConfig::default()).unwrap().base_url(),
            "https://ask-cal.netlify.app"
        );
    }

    #[tokio::test]
    async fn test_search_strips_title_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(body_json(json!({"queryString": "find one and update"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryId": "abc123",
                "codeExamples": [
                    example_json("Compound Operations - MongoDB Docs"),
                    example_json("Update Documents"),
                ]
            })))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        assert_ok!(
            provider
                .search(&SearchRequest::new("find one and update"), false)
                .await
        );

        let state = provider.store().snapshot();
        let titles: Vec<_> = state.results.iter().map(|r| r.page_title.as_str()).collect();
        assert_eq!(titles, vec!["Compound Operations", "Update Documents"]);
        assert_eq!(state.search_query_id.as_deref(), Some("abc123"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_mock_search_returns_canned_examples() {
        // Unreachable base URL: mock mode must not touch the network
        let provider = provider("http://127.0.0.1:1");
        assert_ok!(provider.search(&SearchRequest::new("anything at all"), true).await);

        let state = provider.store().snapshot();
        assert_eq!(state.results.len(), 2);
        assert!(state.results.iter().all(|r| r.language == "java"));
        assert!(state
            .results
            .iter()
            .all(|r| !r.page_title.ends_with(" - MongoDB Docs")));
        assert_eq!(state.search_query_id.as_deref(), Some("fake-string-id"));
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        assert_ok!(provider.search(&SearchRequest::new("seed"), true).await);
        let err = assert_err!(provider.search(&SearchRequest::new("find"), false).await);

        assert!(matches!(err, ApiError::Transport { .. }));
        let state = provider.store().snapshot();
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.api_error.as_deref(), Some("Service Unavailable"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_search_with_wrong_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"codeExamples": "nope"})),
            )
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let err = assert_err!(provider.search(&SearchRequest::new("find"), false).await);
        assert!(matches!(err, ApiError::Parse(_)));
        assert_eq!(
            provider.store().snapshot().api_error.as_deref(),
            Some("Invalid response format.")
        );
    }

    #[tokio::test]
    async fn test_get_ai_summary_replaces_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AI_SUMMARY_PATH))
            .and(body_json(json!({"code": "x = 1", "pageUrl": "https://example.com/page"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("Assigns one to x."))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let payload = AiSummaryPayload {
            code: "x = 1".to_string(),
            page_url: "https://example.com/page".to_string(),
        };
        assert_ok!(provider.get_ai_summary(&payload).await);

        let state = provider.store().snapshot();
        assert_eq!(state.ai_summary.as_deref(), Some("Assigns one to x."));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_get_ai_summary_failure_records_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let payload = AiSummaryPayload {
            code: String::new(),
            page_url: String::new(),
        };
        assert_err!(provider.get_ai_summary(&payload).await);

        let state = provider.store().snapshot();
        assert_eq!(state.api_error.as_deref(), Some("Too Many Requests"));
        assert_eq!(state.ai_summary.as_deref(), Some(""));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_later_summary_request_wins() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"code": "slow", "pageUrl": ""})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow summary")
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(json!({"code": "fast", "pageUrl": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_string("fast summary"))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let slow = AiSummaryPayload {
            code: "slow".to_string(),
            page_url: String::new(),
        };
        let fast = AiSummaryPayload {
            code: "fast".to_string(),
            page_url: String::new(),
        };

        let first = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.get_ai_summary(&slow).await })
        };
        // Make sure the slow request took its ticket first
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_ok!(provider.get_ai_summary(&fast).await);
        assert_ok!(first.await.unwrap());

        // The slow request completed last but started first
        assert_eq!(
            provider.store().snapshot().ai_summary.as_deref(),
            Some("fast summary")
        );
    }

    #[tokio::test]
    async fn test_empty_summary_body_records_missing_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AI_SUMMARY_PATH))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let payload = AiSummaryPayload {
            code: "x = 1".to_string(),
            page_url: String::new(),
        };
        assert_ok!(provider.get_ai_summary(&payload).await);

        let state = provider.store().snapshot();
        assert_eq!(state.api_error.as_deref(), Some(SUMMARY_MISSING_MESSAGE));
        assert_eq!(state.ai_summary.as_deref(), Some(""));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_aborted_summary_keeps_newer_request_loading() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AI_SUMMARY_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late summary")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let spawn_summary = |code: &str| {
            let provider = provider.clone();
            let payload = AiSummaryPayload {
                code: code.to_string(),
                page_url: String::new(),
            };
            tokio::spawn(async move { provider.get_ai_summary(&payload).await })
        };

        let older = spawn_summary("older");
        tokio::time::sleep(Duration::from_millis(50)).await;
        let newer = spawn_summary("newer");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(provider.store().snapshot().loading);

        older.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = provider.store().snapshot();
        assert!(state.loading);
        assert_eq!(state.ai_summary.as_deref(), Some(""));

        assert_ok!(newer.await.unwrap());
        let state = provider.store().snapshot();
        assert!(!state.loading);
        assert_eq!(state.ai_summary.as_deref(), Some("late summary"));
    }

    #[tokio::test]
    async fn test_feedback_and_request_example_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FEEDBACK_PATH))
            .and(body_json(json!({"queryId": "q", "pageUrl": "u"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(REQUEST_EXAMPLE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let feedback = assert_ok!(
            provider
                .report_feedback(&json!({"queryId": "q", "pageUrl": "u"}), false)
                .await
        );
        assert_eq!(feedback, json!({"success": true}));

        let requested = assert_ok!(
            provider
                .request_example(&json!({"queryString": "bulk write"}), false)
                .await
        );
        assert_eq!(requested, json!({"success": false}));

        let state = provider.store().snapshot();
        assert!(state.results.is_empty());
        assert!(state.ai_summary.is_none());
    }

    #[tokio::test]
    async fn test_mock_feedback() {
        let provider = provider("http://127.0.0.1:1");
        let value = assert_ok!(provider.report_feedback(&json!({}), true).await);
        assert_eq!(value, json!({"success": true}));
    }
}
