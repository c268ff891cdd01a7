//! Tolerant decoding of model replies.
//!
//! Every call site asks for JSON, but the model does not always comply. Rather
//! than sniffing shapes at each site, replies are classified once here and the
//! caller decides what a fallback means for it.

use serde::de::DeserializeOwned;
use tracing::warn;

use super::{ChatModel, ChatRequest, LlmError};

/// Outcome of one model call.
#[derive(Debug)]
pub enum Decoded<T> {
    /// The reply parsed as the expected JSON shape.
    Parsed(T),
    /// The reply arrived but was not the expected JSON. Carries the
    /// fence-stripped text.
    Fallback(String),
    /// No usable reply: transport or API failure, or empty content.
    Failed(LlmError),
}

impl<T> Decoded<T> {
    /// Converts to a `Result`, treating a fallback as an error produced by `on_fallback`.
    pub fn require<E>(
        self,
        on_fallback: impl FnOnce(String) -> E,
        on_failed: impl FnOnce(LlmError) -> E,
    ) -> Result<T, E> {
        match self {
            Decoded::Parsed(value) => Ok(value),
            Decoded::Fallback(text) => Err(on_fallback(text)),
            Decoded::Failed(error) => Err(on_failed(error)),
        }
    }
}

/// Classifies raw reply text against the expected shape `T`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Decoded<T> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Decoded::Failed(LlmError::EmptyContent);
    }
    match serde_json::from_str::<T>(text) {
        Ok(value) => Decoded::Parsed(value),
        Err(e) => {
            warn!(
                "Model reply did not decode ({e}): {:?}",
                text.chars().take(200).collect::<String>()
            );
            Decoded::Fallback(text.to_string())
        }
    }
}

/// Calls the model and decodes its reply in one step.
pub async fn call_decoded<T: DeserializeOwned>(
    llm: &dyn ChatModel,
    request: ChatRequest<'_>,
) -> Decoded<T> {
    match llm.complete(request).await {
        Ok(text) => decode(&text),
        Err(e) => Decoded::Failed(e),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
