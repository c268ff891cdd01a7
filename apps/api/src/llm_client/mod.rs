//! LLM Client — the single point of entry for all chat-completion calls in Copydesk.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! All LLM interactions MUST go through the `ChatModel` trait defined here.
//!
//! Models are hardcoded per task below, not configurable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod decode;
pub mod prompts;

pub use decode::{call_decoded, Decoded};

/// Used for style guide summaries.
pub const STYLE_SUMMARY_MODEL: &str = "gpt-4o-mini";
/// Used for article generation and analysis.
pub const ARTICLE_MODEL: &str = "gpt-4o";
/// Used for scoring submissions and hints.
pub const EVAL_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One system/user prompt pair sent to the model.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
}

/// Seam between the game logic and the remote provider. `AppState` carries an
/// `Arc<dyn ChatModel>` so tests can script replies.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the prompt pair in JSON-object mode and returns the reply text.
    /// Blank replies are reported as `LlmError::EmptyContent`.
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
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

impl CompletionResponse {
    /// Extracts the text of the first choice, if it carries any non-blank content.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The production `ChatModel`: an OpenAI-compatible chat completions client.
/// Calls are made once; failures are surfaced to the caller without retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Makes a raw call to the chat completions endpoint, returning the full response object.
    pub async fn call(&self, request: ChatRequest<'_>) -> Result<CompletionResponse, LlmError> {
        let body = CompletionRequest {
            model: request.model,
            messages: [
                CompletionMessage {
                    role: "system",
                    content: request.system,
                },
                CompletionMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        let completion = self.call(request).await?;
        completion
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Scripted `ChatModel` for tests: replays queued replies in order and
/// records every prompt it receives.
#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub model: String,
        pub system: String,
        pub user: String,
        pub temperature: f32,
    }

    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(replies: impl IntoIterator<Item = &'static str>) -> Self {
            let model = Self::default();
            for reply in replies {
                model.push(Ok(reply.to_string()));
            }
            model
        }

        pub fn failing(error: LlmError) -> Self {
            let model = Self::default();
            model.push(Err(error));
            model
        }

        pub fn push(&self, reply: Result<String, LlmError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                model: request.model.to_string(),
                system: request.system.to_string(),
                user: request.user.to_string(),
                temperature: request.temperature,
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }
}
