// HTTP request executor for the serverless functions

use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::decoder::Utf8StreamDecoder;
use super::{ApiError, ApiRequest, RequestKind};
use crate::state::{LoadingGuard, StateAction, Store, SummaryTicket};

#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    pub fn new(request_timeout: Option<u64>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = request_timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ApiError::Network)?;

        Ok(Self { client })
    }

    /// Run one request, keeping the loading and error flags in `store` current.
    ///
    /// Summary requests are read as a text stream and resolve to
    /// `{"summary": ...}`, or to `null` when the body is empty. Every other
    /// kind resolves to the JSON body.
    pub async fn execute(&self, request: ApiRequest, store: &Store) -> Result<Value, ApiError> {
        let mut loading = LoadingGuard::start(store);
        let kind = request.kind;
        info!(%kind, url = %request.url, "sending request");

        let result = self.perform(request, store, &mut loading).await;
        match &result {
            Ok(_) => info!(%kind, "request completed"),
            Err(err) => {
                warn!(%kind, status = ?err.status(), error = %err, "request failed");
                store.dispatch(StateAction::RequestFailed(err.user_message()));
            }
        }
        result
    }

    async fn perform(
        &self,
        request: ApiRequest,
        store: &Store,
        loading: &mut LoadingGuard<'_>,
    ) -> Result<Value, ApiError> {
        let mut builder = self.client.request(request.method, &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }

        if request.kind == RequestKind::GetAiSummary {
            return stream_summary(response.bytes_stream(), request.ticket, store, loading)
                .await
                .map_err(ApiError::Network);
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Publish a summary stream into `store` chunk by chunk.
///
/// Loading only covers the round trip, so it is finished before the first
/// chunk is read. An empty body yields `null`.
async fn stream_summary<S, B, E>(
    stream: S,
    ticket: Option<SummaryTicket>,
    store: &Store,
    loading: &mut LoadingGuard<'_>,
) -> Result<Value, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    loading.finish();

    let summary = accumulate_text(stream, |text| {
        if let Some(ticket) = ticket {
            store.dispatch(StateAction::SummaryProgress {
                ticket,
                text: text.to_string(),
            });
        }
    })
    .await?;

    if summary.is_empty() {
        return Ok(Value::Null);
    }
    Ok(json!({ "summary": summary }))
}

/// Drain a byte stream into a string, calling `on_progress` with the running
/// text after every chunk.
pub async fn accumulate_text<S, B, E, F>(stream: S, mut on_progress: F) -> Result<String, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    F: FnMut(&str),
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = Utf8StreamDecoder::new();
    let mut text = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let bytes = chunk.as_ref();
        text.push_str(&decoder.decode(bytes, true));
        debug!(chunk_len = bytes.len(), total_len = text.len(), "stream chunk");
        on_progress(&text);
    }

    let tail = decoder.finish();
    if !tail.is_empty() {
        text.push_str(&tail);
        on_progress(&text);
    }

    Ok(text)
}
