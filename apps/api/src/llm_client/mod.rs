/// LLM Client — the single point of entry for all chat-completion calls.
///
/// No other module may call the OpenAI API directly.
///
/// Model: gpt-4.1 at temperature 0.5 (hardcoded so generated copy stays consistent)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for every completion.
pub const MODEL: &str = "gpt-4.1";
const TEMPERATURE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A `{ type: "json_schema", json_schema }` response format constraint.
#[derive(Debug, Serialize)]
pub struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    pub format_type: &'a str,
    pub json_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat<'a>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice's message, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

/// Anything that can turn a system + user prompt pair into completion text.
///
/// Carried in `AppState` as `Arc<dyn CompletionBackend>` so handlers never
/// depend on the concrete HTTP client.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the first choice's content, or `""` when the model sent none.
    async fn complete(&self, system: &str, user: &str, schema: &Value)
        -> Result<String, LlmError>;
}

/// Chat-completion client over the OpenAI HTTP API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    url: String,
}

impl LlmClient {
    /// No timeout is configured; the transport default applies.
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, OPENAI_API_URL)
    }

    /// Client against a different completions endpoint.
    pub fn with_url(api_key: String, url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            url: url.to_string(),
        }
    }

    /// Makes one call to the completions endpoint. Non-2xx statuses return
    /// `LlmError::Api` carrying the raw response body; a body that cannot be
    /// read is an `LlmError::Http` instead. Nothing is retried.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        schema: &Value,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = build_request(system, user, schema);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        schema: &Value,
    ) -> Result<String, LlmError> {
        let response = self.call(system, user, schema).await?;
        Ok(response.text().unwrap_or_default().to_string())
    }
}

fn build_request<'a>(system: &'a str, user: &'a str, schema: &'a Value) -> ChatRequest<'a> {
    ChatRequest {
        model: MODEL,
        temperature: TEMPERATURE,
        response_format: ResponseFormat {
            format_type: "json_schema",
            json_schema: schema,
        },
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
    }
}

/// In-memory backends for handler and pipeline tests.
#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    pub enum FakeReply {
        Content(String),
        Status(u16, String),
    }

    /// Replies with a fixed answer and records the prompts it was given.
    pub struct FakeBackend {
        reply: FakeReply,
        pub seen: Mutex<Vec<(String, String)>>,
    }

    impl FakeBackend {
        pub fn content(text: &str) -> Self {
            Self {
                reply: FakeReply::Content(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn status(status: u16, body: &str) -> Self {
            Self {
                reply: FakeReply::Status(status, body.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for FakeBackend {
        async fn complete(
            &self,
            system: &str,
            user: &str,
            _schema: &Value,
        ) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match &self.reply {
                FakeReply::Content(text) => Ok(text.clone()),
                FakeReply::Status(status, body) => Err(LlmError::Api {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }
}
