//! Hint generation. Only error metadata is shared with the model, never the
//! original text or its correction, and any unusable reply degrades to a
//! generic hint.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::game::prompts::{FALLBACK_HINT, HINT_SYSTEM, HINT_USER_TEMPLATE};
use crate::llm_client::prompts::{fill, with_json_instruction};
use crate::llm_client::{call_decoded, ChatModel, ChatRequest, Decoded, EVAL_MODEL};
use crate::models::Game;

const HINT_TEMPERATURE: f32 = 0.7;

/// The subset of an error the hint model may see.
#[derive(Debug, Serialize)]
struct HintErrorMetadata<'a> {
    id: &'a str,
    error_type: &'a str,
    category: &'a str,
    rule_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct HintReply {
    hint: Option<String>,
}

fn hint_from(decoded: Decoded<HintReply>) -> Result<String, AppError> {
    match decoded {
        Decoded::Parsed(HintReply { hint: Some(hint) }) if !hint.trim().is_empty() => Ok(hint),
        Decoded::Parsed(_) | Decoded::Fallback(_) => {
            warn!("Hint reply unusable; sending fallback hint");
            Ok(FALLBACK_HINT.to_string())
        }
        Decoded::Failed(e) => Err(AppError::Llm(format!("Hint request failed: {e}"))),
    }
}

/// Asks the model for one hint about the game's errors.
pub async fn generate_hint(
    llm: &dyn ChatModel,
    game: &Game,
    rules_summary: &str,
) -> Result<String, AppError> {
    let metadata: Vec<HintErrorMetadata<'_>> = game
        .errors
        .iter()
        .map(|e| HintErrorMetadata {
            id: &e.descriptor.id,
            error_type: &e.descriptor.error_type,
            category: &e.descriptor.category,
            rule_description: &e.descriptor.rule_description,
        })
        .collect();
    let error_metadata = serde_json::to_string_pretty(&metadata)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize error metadata: {e}")))?;

    let system = with_json_instruction(HINT_SYSTEM);
    let user = fill(
        HINT_USER_TEMPLATE,
        &[
            ("rules_summary", rules_summary),
            ("article", &game.article),
            ("error_metadata", &error_metadata),
        ],
    );

    let request = ChatRequest {
        model: EVAL_MODEL,
        system: &system,
        user: &user,
        temperature: HINT_TEMPERATURE,
    };

    hint_from(call_decoded(llm, request).await)
}
