//! Article generation and analysis — produces a new Game.
//!
//! Flow: resolve style guide → build prompt (generate or analyze) → LLM call →
//!       validate `{article, errors}` → offset annotation → store Game.
//!
//! A malformed reply fails the request. There is no retry.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::game::offsets::annotate;
use crate::game::prompts::{
    ANALYZE_SYSTEM_TEMPLATE, ANALYZE_USER_TEMPLATE, GENERATE_SYSTEM_TEMPLATE,
    GENERATE_USER_TEMPLATE,
};
use crate::llm_client::prompts::{fill, with_json_instruction, ERROR_RECORD_SCHEMA};
use crate::llm_client::{call_decoded, ChatModel, ChatRequest, ARTICLE_MODEL};
use crate::models::{ArticleSource, ErrorDescriptor, Game, StyleGuide};
use crate::store::GameStore;

/// Hard ceiling on requested article length.
pub const MAX_WORDS: u32 = 1000;
const DEFAULT_WORDS: u32 = 600;
const DEFAULT_NUM_ERRORS: u32 = 10;
const DEFAULT_DIFFICULTY: &str = "medium";
const DEFAULT_SUBJECT: &str = "General news";
const DEFAULT_TONE: &str = "AP-style news article";

const GENERATE_TEMPERATURE: f32 = 0.8;
const ANALYZE_TEMPERATURE: f32 = 0.3;

// ────────────────────────────────────────────────────────────────────────────
// Parameters
// ────────────────────────────────────────────────────────────────────────────

/// Knobs for a generated article. Absent fields take the defaults above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub length: Option<String>,
    pub word_count: Option<u32>,
    pub difficulty: Option<String>,
    pub num_errors: Option<u32>,
    pub subject: Option<String>,
    pub tone: Option<String>,
}

/// What the caller wants: a fresh article, or errors found in their own.
#[derive(Debug, Clone)]
pub enum ArticleTask {
    Generate(GenerationParams),
    Analyze { article: String },
}

/// Maps a named length bucket to a word count. Unknown names get the medium length.
pub fn words_for_length(length: &str) -> u32 {
    match length {
        "short" => 300,
        "medium" => 600,
        "long" => 900,
        _ => DEFAULT_WORDS,
    }
}

/// Target word count: an explicit non-zero `wordCount` wins over the length
/// bucket; either way the result is capped at [`MAX_WORDS`].
pub fn target_word_count(params: &GenerationParams) -> u32 {
    let words = match params.word_count {
        Some(n) if n > 0 => n,
        _ => params
            .length
            .as_deref()
            .map_or(DEFAULT_WORDS, words_for_length),
    };
    words.min(MAX_WORDS)
}

// ────────────────────────────────────────────────────────────────────────────
// Reply validation
// ────────────────────────────────────────────────────────────────────────────

/// Raw reply shape. Fields stay loose so each defect gets its own message.
#[derive(Debug, Deserialize)]
struct ArticleReply {
    article: Option<Value>,
    errors: Option<Value>,
}

/// A reply that passed validation.
#[derive(Debug)]
struct ArticlePayload {
    article: String,
    errors: Vec<ErrorDescriptor>,
}

fn validate_reply(reply: ArticleReply) -> Result<ArticlePayload, AppError> {
    let invalid = || AppError::Llm("Invalid response format from model".to_string());

    let article = match reply.article {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => return Err(invalid()),
    };
    let errors = match reply.errors {
        Some(Value::Array(items)) => items,
        _ => return Err(invalid()),
    };

    let errors = errors
        .into_iter()
        .map(serde_json::from_value::<ErrorDescriptor>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Llm(format!("Malformed error entry in model response: {e}")))?;

    Ok(ArticlePayload {
        article,
        errors: number_missing_ids(errors),
    })
}

/// Gives every descriptor without an id a positional one (`e1`, `e2`, ...).
fn number_missing_ids(errors: Vec<ErrorDescriptor>) -> Vec<ErrorDescriptor> {
    errors
        .into_iter()
        .enumerate()
        .map(|(i, mut e)| {
            if e.id.trim().is_empty() {
                e.id = format!("e{}", i + 1);
            }
            e
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the generate or analyze task against `guide` and stores the resulting Game.
pub async fn create_game(
    llm: &dyn ChatModel,
    games: &GameStore,
    guide: &StyleGuide,
    task: ArticleTask,
) -> Result<Game, AppError> {
    let (system, user, temperature, source) = match &task {
        ArticleTask::Generate(params) => {
            let (system, user) = build_generate_prompts(guide, params);
            (system, user, GENERATE_TEMPERATURE, ArticleSource::Generated)
        }
        ArticleTask::Analyze { article } => {
            let (system, user) = build_analyze_prompts(guide, article);
            (system, user, ANALYZE_TEMPERATURE, ArticleSource::Analyzed)
        }
    };

    info!("Requesting {:?} article for style guide {}", source, guide.id);

    let request = ChatRequest {
        model: ARTICLE_MODEL,
        system: &system,
        user: &user,
        temperature,
    };

    let reply: ArticleReply = call_decoded(llm, request).await.require(
        |_| AppError::Llm("Failed to parse article data from model response".to_string()),
        |e| AppError::Llm(format!("Article request failed: {e}")),
    )?;

    let payload = match task {
        ArticleTask::Generate(_) => validate_reply(reply)?,
        ArticleTask::Analyze { article } => {
            // The user's text is authoritative; offsets must match what they see.
            let mut payload = validate_reply(ArticleReply {
                article: Some(Value::String(article.clone())),
                errors: reply.errors,
            })?;
            if reply.article.as_ref().and_then(Value::as_str) != Some(article.as_str()) {
                warn!("Model altered the analyzed article; keeping the submitted text");
            }
            payload.article = article;
            payload
        }
    };

    let errors = annotate(&payload.article, payload.errors);
    let located = errors.iter().filter(|e| e.is_located()).count();

    let stored = games
        .insert(Game::new(guide.id, source, payload.article, errors))
        .await;

    info!(
        "Created game {} ({:?}) with {} errors, {} located",
        stored.id,
        stored.source,
        stored.errors.len(),
        located
    );

    Ok((*stored).clone())
}

fn build_generate_prompts(guide: &StyleGuide, params: &GenerationParams) -> (String, String) {
    let target_words = target_word_count(params).to_string();
    let num_errors = params.num_errors.unwrap_or(DEFAULT_NUM_ERRORS).to_string();

    let system = fill(
        GENERATE_SYSTEM_TEMPLATE,
        &[
            ("target_words", &target_words),
            ("subject", params.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)),
            ("tone", params.tone.as_deref().unwrap_or(DEFAULT_TONE)),
            (
                "difficulty",
                params.difficulty.as_deref().unwrap_or(DEFAULT_DIFFICULTY),
            ),
            ("num_errors", &num_errors),
            ("error_schema", ERROR_RECORD_SCHEMA),
        ],
    );
    let user = fill(
        GENERATE_USER_TEMPLATE,
        &[
            ("rules_summary", &guide.rules_summary),
            ("num_errors", &num_errors),
        ],
    );

    (with_json_instruction(&system), user)
}

fn build_analyze_prompts(guide: &StyleGuide, article: &str) -> (String, String) {
    let system = fill(
        ANALYZE_SYSTEM_TEMPLATE,
        &[("error_schema", ERROR_RECORD_SCHEMA)],
    );
    let user = fill(
        ANALYZE_USER_TEMPLATE,
        &[("rules_summary", &guide.rules_summary), ("article", article)],
    );

    (with_json_instruction(&system), user)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
