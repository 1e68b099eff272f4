use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream;
use futures::{StreamExt as _, TryStreamExt as _};
use tracing::debug;
use uuid::Uuid;

use crate::config::XaiConfig;
use crate::errors::XaiError;
use crate::message::Message;
use crate::model::{ModelSelection, resolve_model};
use crate::sse::{SseLineDecoder, frame_events};
use crate::stream::{EventStream, StreamEvent};

type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<bytes::Bytes, XaiError>> + Send + 'static>>;

/// Streaming client for the X.AI chat-completions API.
///
/// Each call opens exactly one connection and yields normalized events as
/// they arrive; retries live outside the client (see [`crate::retry`]).
pub struct XaiClient {
    client: reqwest::Client,
    config: XaiConfig,
}

impl XaiClient {
    /// Creates a client from explicit configuration.
    pub fn new(config: XaiConfig) -> Result<Self, XaiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| XaiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Creates a client using `XAI_API_KEY`.
    pub fn from_env() -> Result<Self, XaiError> {
        Self::new(XaiConfig::from_env()?)
    }

    /// Returns the model the next call will use.
    pub fn model(&self) -> ModelSelection {
        resolve_model(self.config.model.as_deref())
    }

    /// Opens one streaming chat completion.
    ///
    /// The first wire message is always the system prompt; `messages` follow
    /// in order. The returned stream yields text deltas and usage totals in
    /// byte-arrival order until the provider closes the stream. Dropping the
    /// stream releases the connection.
    pub async fn stream_chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<EventStream, XaiError> {
        if self.config.api_key.trim().is_empty() {
            return Err(XaiError::MissingApiKey);
        }

        let selection = self.model();
        let body = build_request_body(&selection.id, system_prompt, messages);
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, model = %selection.id, "starting X.AI chat completion stream");

        let response = self
            .client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| XaiError::transport(format!("X.AI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status, &body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        if !is_event_stream(content_type) {
            return Err(XaiError::NoResponseBody);
        }

        let bytes_stream: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| XaiError::transport(format!("X.AI streaming read failed: {e}"))),
        );
        Ok(Box::pin(xai_event_stream(request_id, bytes_stream)))
    }
}

pub(crate) fn build_request_body(
    model_id: &str,
    system_prompt: &str,
    messages: &[Message],
) -> serde_json::Value {
    let mut wire = Vec::with_capacity(messages.len() + 1);
    wire.push(serde_json::json!({
        "role": "system",
        "content": system_prompt,
    }));
    for message in messages {
        wire.push(serde_json::json!({
            "role": message.role,
            "content": message.content,
        }));
    }

    serde_json::json!({
        "model": model_id,
        "messages": wire,
        "temperature": 0,
        "stream": true,
    })
}

/// Builds the error for a non-success response: the status line, extended
/// with the provider's `error.message` when the body carries one.
fn http_error(status: reqwest::StatusCode, body: &str) -> XaiError {
    let mut message = match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    };
    if let Some(detail) = extract_error_message(body) {
        message = format!("{message} - {detail}");
    }
    XaiError::Http {
        status: status.as_u16(),
        message,
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error.message)
}

fn is_event_stream(content_type: Option<&str>) -> bool {
    match content_type {
        Some(value) => value
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("text/event-stream"),
        None => true,
    }
}

fn xai_event_stream(
    request_id: Uuid,
    bytes_stream: ByteStream,
) -> impl futures::Stream<Item = Result<StreamEvent, XaiError>> + Send {
    struct State {
        request_id: Uuid,
        bytes_stream: ByteStream,
        decoder: SseLineDecoder,
        pending: VecDeque<StreamEvent>,
        done: bool,
    }

    stream::try_unfold(
        State {
            request_id,
            bytes_stream,
            decoder: SseLineDecoder::default(),
            pending: VecDeque::new(),
            done: false,
        },
        |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    return Ok(Some((event, state)));
                }
                if state.done {
                    debug!(request_id = %state.request_id, "X.AI stream completed");
                    return Ok(None);
                }

                match state.bytes_stream.next().await {
                    Some(Ok(chunk)) => {
                        for frame in state.decoder.push_chunk(&chunk) {
                            for event in frame_events(frame) {
                                state.pending.push_back(event);
                            }
                        }
                        continue;
                    }
                    Some(Err(e)) => return Err(e),
                    None => {
                        state.done = true;
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn byte_stream(chunks: Vec<Result<Bytes, XaiError>>) -> ByteStream {
        Box::pin(stream::iter(chunks))
    }

    #[test]
    fn request_body_places_system_message_first() {
        let body = build_request_body(
            "grok-2-latest",
            "You are terse.",
            &[
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("again"),
            ],
        );

        assert_eq!(
            body.get("model").and_then(|v| v.as_str()),
            Some("grok-2-latest")
        );
        assert_eq!(body.get("temperature").and_then(|v| v.as_u64()), Some(0));
        assert_eq!(body.get("stream").and_then(|v| v.as_bool()), Some(true));

        let messages = body
            .get("messages")
            .and_then(|v| v.as_array())
            .expect("messages");
        assert_eq!(messages.len(), 4);
        assert_eq!(
            messages[0].get("role").and_then(|v| v.as_str()),
            Some("system")
        );
        assert_eq!(
            messages[0].get("content").and_then(|v| v.as_str()),
            Some("You are terse.")
        );
        assert_eq!(
            messages[1].get("role").and_then(|v| v.as_str()),
            Some("user")
        );
        assert_eq!(
            messages[2].get("role").and_then(|v| v.as_str()),
            Some("assistant")
        );
    }

    #[test]
    fn http_error_includes_status_and_provider_message() {
        let err = http_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"bad request"}}"#,
        );
        assert!(matches!(err, XaiError::Http { status: 400, .. }));
        let text = err.to_string();
        assert!(text.contains("400"), "missing status in {text:?}");
        assert!(text.contains("bad request"), "missing detail in {text:?}");
    }

    #[test]
    fn http_error_falls_back_to_status_line_on_unparseable_body() {
        let err = http_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "X.AI API error: 500 Internal Server Error");
    }

    #[test]
    fn content_type_gate_accepts_event_streams_only() {
        assert!(is_event_stream(Some("text/event-stream")));
        assert!(is_event_stream(Some("text/event-stream; charset=utf-8")));
        assert!(is_event_stream(None));
        assert!(!is_event_stream(Some("application/json")));
        assert!(!is_event_stream(Some("text/html; charset=utf-8")));
    }

    #[test]
    fn configured_model_is_used_when_known() {
        let client = XaiClient::new(XaiConfig::new("key").model("grok-beta")).expect("client");
        assert_eq!(client.model().id, "grok-beta");

        let client = XaiClient::new(XaiConfig::new("key")).expect("client");
        assert_eq!(client.model().id, crate::model::DEFAULT_MODEL_ID);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = XaiClient::new(XaiConfig::new("   ")).expect("client");
        let err = client
            .stream_chat("sys", &[Message::user("hi")])
            .await
            .map(|_| ())
            .expect_err("should fail");
        assert_eq!(err, XaiError::MissingApiKey);
    }

    #[tokio::test]
    async fn emits_text_then_usage_across_frames() {
        let events: Vec<StreamEvent> = xai_event_stream(
            Uuid::new_v4(),
            byte_stream(vec![
                Ok(Bytes::from_static(
                    b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n",
                )),
                Ok(Bytes::from_static(
                    b"data: {\"usage\":{\"prompt_tokens\":5,\"completion_tokens\":2}}\n",
                )),
            ]),
        )
        .try_collect()
        .await
        .expect("stream");

        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta { text: "Hi".into() },
                StreamEvent::UsageTotal {
                    input_tokens: 5,
                    output_tokens: 2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn reassembles_frames_split_across_chunks() {
        let events: Vec<StreamEvent> = xai_event_stream(
            Uuid::new_v4(),
            byte_stream(vec![
                Ok(Bytes::from_static(b"data: {\"cho")),
                Ok(Bytes::from_static(
                    b"ices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n",
                )),
            ]),
        )
        .try_collect()
        .await
        .expect("stream");

        assert_eq!(events, vec![StreamEvent::TextDelta { text: "Hi".into() }]);
    }

    #[tokio::test]
    async fn transport_interruption_preserves_prior_events() {
        let mut stream = Box::pin(xai_event_stream(
            Uuid::new_v4(),
            byte_stream(vec![
                Ok(Bytes::from_static(
                    b"data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n",
                )),
                Err(XaiError::transport("connection reset")),
            ]),
        ));

        let first = stream.next().await.expect("first event").expect("ok event");
        assert_eq!(
            first,
            StreamEvent::TextDelta {
                text: "partial".into()
            }
        );

        let second = stream.next().await.expect("second item");
        assert!(matches!(second, Err(XaiError::Transport { .. })));
    }

    #[tokio::test]
    async fn trailing_partial_line_is_discarded_at_end_of_stream() {
        let events: Vec<StreamEvent> = xai_event_stream(
            Uuid::new_v4(),
            byte_stream(vec![
                Ok(Bytes::from_static(
                    b"data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n",
                )),
                Ok(Bytes::from_static(b"data: {\"cho")),
            ]),
        )
        .try_collect()
        .await
        .expect("stream");

        assert_eq!(events, vec![StreamEvent::TextDelta { text: "ok".into() }]);
    }

    #[tokio::test]
    async fn env_gated_smoke_streams_text_if_key_present() {
        if std::env::var("XAI_API_KEY")
            .unwrap_or_default()
            .trim()
            .is_empty()
        {
            eprintln!("skipping X.AI smoke test (XAI_API_KEY missing)");
            return;
        }

        let client = XaiClient::from_env().expect("client");
        let mut stream = client
            .stream_chat(
                "Reply with one short word.",
                &[Message::user("Say hello")],
            )
            .await
            .expect("stream");

        let mut text = String::new();
        while let Some(event) = stream.next().await {
            match event.expect("event") {
                StreamEvent::TextDelta { text: delta } => text.push_str(&delta),
                StreamEvent::UsageTotal { .. } => {}
            }
        }
        assert!(!text.trim().is_empty(), "expected non-empty response text");
    }
}
