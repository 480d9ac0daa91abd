/// LLM Client — the single point of entry for calls to the text-completion service.
///
/// ARCHITECTURAL RULE: No other module may call the AI endpoint directly.
/// All LLM interactions MUST go through this module.
///
/// Speaks the OpenAI chat-completions dialect. One attempt per call, no retries:
/// callers fall back to local analysis instead.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_API_URL: &str = "https://text.pollinations.ai/openai";
pub const DEFAULT_MODEL: &str = "openai";
const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No JSON object found in LLM response")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// OpenAI-style response. Some compatible services put the text at the top
/// level instead of under `choices`, so both shapes are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub content: Option<String>,
    pub response: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl ChatResponse {
    /// The assistant's text: first choice, else top-level `content`, else `response`.
    /// Blank strings count as absent.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .or(self.content.as_deref())
            .or(self.response.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Makes a single chat-completion call and returns the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let mut request = self
            .client
            .post(&self.settings.api_url)
            .header("content-type", "application/json")
            .json(&request_body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={:?}, completion_tokens={:?}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }

    /// Calls the LLM and parses the first JSON object embedded in its reply.
    /// The prompt must instruct the model to return a JSON object.
    pub async fn call_json(&self, prompt: &str, system: &str) -> Result<Value, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        debug!("LLM response text: {text}");

        let object = extract_json_object(text).ok_or(LlmError::NoJson)?;
        serde_json::from_str(object).map_err(LlmError::Parse)
    }
}

/// Finds the first balanced top-level `{ ... }` in `text`.
///
/// Braces inside JSON string literals are ignored, so prose or markdown
/// fences around the object are tolerated. Returns `None` when no opening
/// brace is ever closed.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_object_end(&text[start..]) {
            return Some(&text[start..start + end]);
        }
        search_from = start + 1;
    }

    None
}

/// Byte length of the object starting at `text[0] == '{'`, if it closes.
fn balanced_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use axum::{
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;

    /// Serves `body` with `status` for every POST on a local port.
    async fn spawn_stub(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            "/openai",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/openai")
    }

    fn client_for(api_url: String) -> LlmClient {
        LlmClient::new(LlmSettings {
            api_url,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_extract_plain_object() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(extract_json_object(input), Some(input));
    }

    #[test]
    fn test_extract_object_surrounded_by_prose() {
        let input = "Sure! Here is the analysis:\n{\"score\": 80}\nLet me know if...";
        assert_eq!(extract_json_object(input), Some("{\"score\": 80}"));
    }

    #[test]
    fn test_extract_object_inside_code_fence() {
        let input = "```json\n{\"key\": {\"nested\": [1, 2]}}\n```";
        assert_eq!(
            extract_json_object(input),
            Some("{\"key\": {\"nested\": [1, 2]}}")
        );
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let input = r#"{"text": "use } and { freely", "quote": "a \"}\" b"} trailing }"#;
        assert_eq!(
            extract_json_object(input),
            Some(r#"{"text": "use } and { freely", "quote": "a \"}\" b"}"#)
        );
    }

    #[test]
    fn test_extract_returns_first_of_several_objects() {
        let input = r#"{"a": 1} {"b": 2}"#;
        assert_eq!(extract_json_object(input), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_none_without_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{ never closed"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_text_prefers_choices_then_content_then_response() {
        let from_choices: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "first"}}],
            "content": "second"
        }))
        .unwrap();
        assert_eq!(from_choices.text(), Some("first"));

        let from_content: ChatResponse =
            serde_json::from_value(json!({"content": "second", "response": "third"})).unwrap();
        assert_eq!(from_content.text(), Some("second"));

        let from_response: ChatResponse =
            serde_json::from_value(json!({"response": "third"})).unwrap();
        assert_eq!(from_response.text(), Some("third"));
    }

    #[test]
    fn test_text_blank_is_absent() {
        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "  "}}]})).unwrap();
        assert_eq!(response.text(), None);
    }

    #[tokio::test]
    async fn test_call_json_parses_embedded_object() {
        let url = spawn_stub(
            StatusCode::OK,
            json!({
                "choices": [{"message": {"content": "Result: {\"matchScore\": 72}"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5}
            }),
        )
        .await;

        let value = client_for(url).call_json("prompt", "system").await.unwrap();
        assert_eq!(value["matchScore"], 72);
    }

    type Captured = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

    /// Records each request's headers and JSON body, replying with a fixed object.
    async fn spawn_recording_stub() -> (String, Captured) {
        let seen: Captured = Arc::default();
        let recorder = seen.clone();
        let app = Router::new().route(
            "/openai",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push((headers, body));
                    Json(json!({"choices": [{"message": {"content": "{\"ok\": true}"}}]}))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}/openai"), seen)
    }

    #[tokio::test]
    async fn test_request_carries_chat_completion_fields() {
        let (url, seen) = spawn_recording_stub().await;
        let client = LlmClient::new(LlmSettings {
            api_url: url,
            model: "gpt-test".to_string(),
            api_key: Some("k".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        client.call_json("the prompt", "the system").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (headers, body) = &seen[0];
        assert_eq!(headers[AUTHORIZATION], "Bearer k");
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "the system"},
                {"role": "user", "content": "the prompt"}
            ])
        );
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
    }

    #[tokio::test]
    async fn test_request_without_key_sends_no_authorization() {
        let (url, seen) = spawn_recording_stub().await;

        client_for(url).call_json("prompt", "system").await.unwrap();

        let seen = seen.lock().unwrap();
        let (headers, body) = &seen[0];
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(body["model"], DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let url = spawn_stub(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "down"})).await;

        let err = client_for(url).call_json("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_content_error() {
        let url = spawn_stub(StatusCode::OK, json!({"choices": []})).await;

        let err = client_for(url).call_json("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_prose_only_reply_is_no_json_error() {
        let url = spawn_stub(
            StatusCode::OK,
            json!({"choices": [{"message": {"content": "I cannot help with that."}}]}),
        )
        .await;

        let err = client_for(url).call_json("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::NoJson));
    }

    #[tokio::test]
    async fn test_malformed_object_is_parse_error() {
        let url = spawn_stub(
            StatusCode::OK,
            json!({"choices": [{"message": {"content": "{matchScore: 50}"}}]}),
        )
        .await;

        let err = client_for(url).call_json("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}/openai"))
            .call("prompt", "system")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
