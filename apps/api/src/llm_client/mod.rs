/// LLM Client — the single point of entry for all completion calls in LeadLoom.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// Lead analysis talks to a `GatewayHandle`, which may be empty when no
/// credential was found or the API was unreachable at startup.
///
/// Model and sampling parameters are fixed; one request per lead, no retries.
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{resolve_credential, Config, OPENAI_API_KEY};

/// The model used for all lead analyses.
pub const MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1500;

pub const STATUS_CONNECTED: &str = "Connected successfully";
pub const STATUS_NOT_CONFIGURED: &str = "API key not configured";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("OpenAI API not available")]
    Unavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that turns a prompt into completion text.
///
/// Carried in `GatewayHandle` as `Arc<dyn CompletionGateway>`.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if the model produced any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAiClient
// ────────────────────────────────────────────────────────────────────────────

/// Chat Completions client. Cheap to clone.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists models to confirm the credential and endpoint work.
    pub async fn probe(&self) -> Result<(), GatewayError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// Makes a single chat completion call and returns the full response object.
    pub async fn call(&self, prompt: &str) -> Result<ChatResponse, GatewayError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let body = check_status(response).await?;
        let chat: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }
}

#[async_trait]
impl CompletionGateway for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let response = self.call(prompt).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(GatewayError::EmptyContent)
    }
}

/// Returns the body of a 2xx response, or an `Api` error with the best message available.
async fn check_status(response: reqwest::Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("OpenAI API returned {}", status);
        return Err(GatewayError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    Ok(body)
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<OpenAiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// GatewayHandle
// ────────────────────────────────────────────────────────────────────────────

/// The gateway as seen by the rest of the app: possibly absent, always with a status line.
#[derive(Clone)]
pub struct GatewayHandle {
    inner: Option<Arc<dyn CompletionGateway>>,
    status: String,
}

impl GatewayHandle {
    pub fn available(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            inner: Some(gateway),
            status: STATUS_CONNECTED.to_string(),
        }
    }

    pub fn unavailable(status: impl Into<String>) -> Self {
        Self {
            inner: None,
            status: status.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Fails with `Unavailable` without touching the network when no gateway is set.
    pub async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        match &self.inner {
            Some(gateway) => gateway.complete(prompt).await,
            None => Err(GatewayError::Unavailable),
        }
    }
}

/// Resolves the API key and probes the endpoint once at startup.
/// Never fails: problems leave the handle unavailable with a status explaining why.
pub async fn init_gateway(config: &Config) -> GatewayHandle {
    let providers = config.credential_providers();
    let Some(api_key) = resolve_credential(OPENAI_API_KEY, &providers) else {
        warn!("{STATUS_NOT_CONFIGURED}; lead analysis will run in degraded mode");
        return GatewayHandle::unavailable(STATUS_NOT_CONFIGURED);
    };

    let client = match OpenAiClient::new(api_key, &config.openai_base_url) {
        Ok(client) => client,
        Err(e) => return connection_failed(e),
    };

    match client.probe().await {
        Ok(()) => {
            info!("LLM gateway connected (model: {MODEL})");
            GatewayHandle::available(Arc::new(client))
        }
        Err(e) => connection_failed(e),
    }
}

fn connection_failed(e: GatewayError) -> GatewayHandle {
    warn!("LLM gateway connection failed: {e}");
    GatewayHandle::unavailable(format!("Connection failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 1500);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_response_text_from_first_choice() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "SCORE: 88"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("SCORE: 88"));
    }

    #[test]
    fn test_response_without_choices_has_no_text() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_api_error_message_decoded() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenAiClient::new("sk-test".to_string(), "http://localhost:9/v1/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9/v1");
    }

    #[tokio::test]
    async fn test_unavailable_handle_fails_fast() {
        let handle = GatewayHandle::unavailable(STATUS_NOT_CONFIGURED);
        assert!(!handle.is_available());
        assert_eq!(handle.status(), "API key not configured");
        let err = handle.complete("prompt").await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable));
        assert_eq!(err.to_string(), "OpenAI API not available");
    }

    #[tokio::test]
    async fn test_init_gateway_unreachable_endpoint_degrades() {
        use std::io::Write;

        let mut secrets = tempfile::NamedTempFile::new().unwrap();
        writeln!(secrets, "OPENAI_API_KEY: sk-test").unwrap();
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
            // Port 9 (discard) on loopback: connection refused.
            openai_base_url: "http://127.0.0.1:9/v1".to_string(),
            secrets_file: secrets.path().to_path_buf(),
        };

        let handle = init_gateway(&config).await;
        assert!(!handle.is_available());
        assert!(handle.status().starts_with("Connection failed:"), "{}", handle.status());
    }

    struct Echo;

    #[async_trait]
    impl CompletionGateway for Echo {
        async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    #[tokio::test]
    async fn test_available_handle_delegates() {
        let handle = GatewayHandle::available(Arc::new(Echo));
        assert!(handle.is_available());
        assert_eq!(handle.status(), STATUS_CONNECTED);
        assert_eq!(handle.complete("hi").await.unwrap(), "echo: hi");
    }
}
