//! Style guide summarization.
//!
//! The model is asked for `{"summary": "..."}` but replies vary. Accepted:
//! a JSON object keyed `summary`, `rules` or `content` (first non-empty wins,
//! non-string values are kept as compact JSON), or any other text, which is
//! used verbatim as the summary.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{fill, with_json_instruction};
use crate::llm_client::{call_decoded, ChatModel, ChatRequest, Decoded, STYLE_SUMMARY_MODEL};
use crate::models::StyleGuide;
use crate::store::StyleGuideStore;
use crate::style_guide::prompts::{STYLE_SUMMARY_PROMPT_TEMPLATE, STYLE_SUMMARY_SYSTEM};

const STYLE_SUMMARY_TEMPERATURE: f32 = 0.3;
const SUMMARY_KEYS: [&str; 3] = ["summary", "rules", "content"];

/// Null, `false`, zero and empty strings do not count as a summary.
fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Picks the summary out of a JSON reply, falling back to the whole reply
/// when none of the known keys holds anything.
fn summary_from_json(reply: Value) -> String {
    let picked = reply.as_object().and_then(|map| {
        SUMMARY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|value| is_meaningful(value))
            .cloned()
    });
    match picked {
        Some(value) => into_text(value),
        None => into_text(reply),
    }
}

/// Turns a decoded reply into the summary text. Only a failed call is an error.
fn rules_summary_from(decoded: Decoded<Value>) -> Result<String, AppError> {
    match decoded {
        Decoded::Parsed(reply) => Ok(summary_from_json(reply)),
        Decoded::Fallback(text) => {
            warn!("Style guide summary was not JSON; using reply verbatim");
            Ok(text)
        }
        Decoded::Failed(e) => Err(AppError::Llm(format!(
            "Failed to summarize style guide: {e}"
        ))),
    }
}

/// Asks the model for a rule summary of `text`.
pub async fn summarize(llm: &dyn ChatModel, name: &str, text: &str) -> Result<String, AppError> {
    let system = with_json_instruction(STYLE_SUMMARY_SYSTEM);
    let user = fill(STYLE_SUMMARY_PROMPT_TEMPLATE, &[("name", name), ("text", text)]);

    let request = ChatRequest {
        model: STYLE_SUMMARY_MODEL,
        system: &system,
        user: &user,
        temperature: STYLE_SUMMARY_TEMPERATURE,
    };

    rules_summary_from(call_decoded(llm, request).await)
}

/// Summarizes and stores a new style guide.
pub async fn create_style_guide(
    llm: &dyn ChatModel,
    store: &StyleGuideStore,
    name: String,
    text: String,
) -> Result<StyleGuide, AppError> {
    info!("Summarizing style guide '{}' ({} chars)", name, text.len());
    let rules_summary = summarize(llm, &name, &text).await?;

    let stored = store
        .insert(StyleGuide::new(name, text, rules_summary))
        .await;
    info!(
        "Stored style guide {} with {}-char summary",
        stored.id,
        stored.rules_summary.len()
    );

    Ok((*stored).clone())
}
