// Canned responses for working without the serverless backend

use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

use super::{ApiError, ApiRequest, RequestKind};
use crate::models::{CodeExample, SearchResponse};
use crate::state::{LoadingGuard, StateAction, Store};

pub const MOCK_QUERY_ID: &str = "fake-string-id";

const MOCK_PAGE_URL: &str =
    "https://mongodb.com/docs/drivers/java/sync/current/crud/compound-operations";
const MOCK_PAGE_TITLE: &str = "Compound Operations - Java Sync Driver v5.5 - MongoDB Docs";

const FIND_ONE_AND_UPDATE: &str = r#"// <MongoCollection set up code here>

// Creates a projection to exclude the "_id" field from the retrieved documents
Bson projection = Projections.excludeId();

// Creates a filter to match documents with a "color" value of "green"
Bson filter = Filters.eq("color", "green");

// Creates an update document to set the value of "food" to "pizza"
Bson update = Updates.set("food", "pizza");

// Defines options that specify projected fields, permit an upsert and limit execution time
FindOneAndUpdateOptions options = new FindOneAndUpdateOptions().
        projection(projection).
        upsert(true).
        maxTime(5, TimeUnit.SECONDS);

// Updates the first matching document with the content of the update document, applying the specified options
Document result = collection.findOneAndUpdate(filter, update, options);

// Prints the matched document in its state before the operation
System.out.println(result.toJson());"#;

const FIND_ONE_AND_REPLACE: &str = r#"// <MongoCollection set up code here>

// Creates instructions to replace the matching document with a new document
Bson filter = Filters.eq("color", "green");
Document replace = new Document("music", "classical").append("color", "green");

// Defines options specifying that the operation should return a document in its post-operation state
FindOneAndReplaceOptions options = new FindOneAndReplaceOptions().
        returnDocument(ReturnDocument.AFTER);

// Atomically finds and replaces the matching document and prints the replacement document
Document result = collection.findOneAndReplace(filter, replace, options);
System.out.println(result.toJson());"#;

fn java_example(code: &str) -> CodeExample {
    CodeExample {
        code: code.to_string(),
        language: "java".to_string(),
        category: "Usage example".to_string(),
        page_url: MOCK_PAGE_URL.to_string(),
        page_title: MOCK_PAGE_TITLE.to_string(),
        page_description: Some(String::new()),
        project_name: Some("java".to_string()),
    }
}

/// The two Java examples every mock search returns.
pub fn mock_search_response() -> SearchResponse {
    SearchResponse {
        query_id: Some(MOCK_QUERY_ID.to_string()),
        code_examples: vec![
            java_example(FIND_ONE_AND_UPDATE),
            java_example(FIND_ONE_AND_REPLACE),
        ],
    }
}

#[derive(Debug, Clone)]
pub struct MockExecutor {
    delay: Duration,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl MockExecutor {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Same bookkeeping as the HTTP executor, with a fixed delay and no network.
    pub async fn execute(&self, request: ApiRequest, store: &Store) -> Result<Value, ApiError> {
        let _loading = LoadingGuard::start(store);
        let kind = request.kind;
        info!(%kind, url = %request.url, "serving mock request");

        tokio::time::sleep(self.delay).await;

        let result = match kind {
            RequestKind::Search => Ok(serde_json::to_value(mock_search_response())?),
            RequestKind::ReportFeedback | RequestKind::RequestExample => {
                Ok(json!({ "success": true }))
            }
            RequestKind::GetAiSummary => Err(ApiError::InvalidRequestType(kind)),
        };

        if let Err(err) = &result {
            warn!(%kind, error = %err, "mock request failed");
            store.dispatch(StateAction::RequestFailed(err.user_message()));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn request(kind: RequestKind) -> ApiRequest {
        ApiRequest::post_json("http://localhost:8888", kind, &json!({})).unwrap()
    }

    #[test]
    fn test_mock_search_response_has_two_java_examples() {
        let response = mock_search_response();
        assert_eq!(response.code_examples.len(), 2);
        assert!(response.code_examples.iter().all(|e| e.language == "java"));
        assert_eq!(response.query_id.as_deref(), Some(MOCK_QUERY_ID));
    }

    #[tokio::test]
    async fn test_mock_search() {
        let store = Store::new();
        let value = assert_ok!(
            MockExecutor::new(Duration::ZERO)
                .execute(request(RequestKind::Search), &store)
                .await
        );
        let response: SearchResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.code_examples.len(), 2);
        assert!(!store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_mock_feedback_and_example_succeed() {
        let executor = MockExecutor::new(Duration::ZERO);
        let store = Store::new();
        for kind in [RequestKind::ReportFeedback, RequestKind::RequestExample] {
            let value = assert_ok!(executor.execute(request(kind), &store).await);
            assert_eq!(value, json!({"success": true}));
        }
    }

    #[tokio::test]
    async fn test_mock_rejects_unsupported_kind_without_touching_data() {
        let store = Store::new();
        store.dispatch(StateAction::SearchCompleted {
            query_id: Some("q".to_string()),
            results: mock_search_response().code_examples,
        });
        let before = store.snapshot();

        let err = assert_err!(
            MockExecutor::new(Duration::ZERO)
                .execute(request(RequestKind::GetAiSummary), &store)
                .await
        );
        assert!(matches!(err, ApiError::InvalidRequestType(RequestKind::GetAiSummary)));

        let after = store.snapshot();
        assert_eq!(after.results, before.results);
        assert_eq!(after.ai_summary, before.ai_summary);
        assert!(!after.loading);
        assert_eq!(after.api_error.as_deref(), Some("Invalid request type"));
    }
}
