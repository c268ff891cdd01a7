//! Axum route handlers for the Game API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{id_text, non_blank, AppJson};
use crate::game::generator::{create_game, ArticleTask, GenerationParams};
use crate::game::hints::generate_hint;
use crate::game::prompts::MISSING_RULES_PLACEHOLDER;
use crate::game::scoring::{score_submission, Evaluation};
use crate::models::{ErrorRecord, Game};
use crate::state::AppState;
use crate::store::parse_id;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateArticleRequest {
    pub style_guide_id: Option<String>,
    /// Present and non-blank: analyze this text instead of generating one.
    pub article: Option<String>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateArticleResponse {
    pub game_id: Uuid,
    pub article: String,
    pub errors: Vec<ErrorRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEditsRequest {
    pub game_id: Option<Value>,
    pub edited_article: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    pub game_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub hint: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-article
///
/// Generates an article seeded with errors, or analyzes the supplied `article`,
/// and stores the result as a new game.
pub async fn handle_generate_article(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateArticleRequest>,
) -> Result<Json<GenerateArticleResponse>, AppError> {
    let invalid = || AppError::Validation("Invalid styleGuideId".to_string());

    let guide_id = request
        .style_guide_id
        .as_deref()
        .and_then(parse_id)
        .ok_or_else(invalid)?;
    let guide = state.style_guides.get(&guide_id).await.ok_or_else(invalid)?;

    let task = match non_blank(request.article) {
        Some(article) => ArticleTask::Analyze { article },
        None => ArticleTask::Generate(request.params),
    };

    let game = create_game(state.llm.as_ref(), &state.games, &guide, task).await?;

    Ok(Json(GenerateArticleResponse {
        game_id: game.id,
        article: game.article,
        errors: game.errors,
    }))
}

/// POST /api/submit-edits
///
/// Scores the player's edited article against the game's answer key.
pub async fn handle_submit_edits(
    State(state): State<AppState>,
    AppJson(request): AppJson<SubmitEditsRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let (Some(game_id), Some(edited_article)) = (
        id_text(request.game_id),
        non_blank(request.edited_article),
    ) else {
        return Err(AppError::Validation(
            "gameId and editedArticle are required".to_string(),
        ));
    };

    let not_found = || AppError::NotFound("Game not found".to_string());
    let game_id = parse_id(&game_id).ok_or_else(not_found)?;
    let game = state.games.get(&game_id).await.ok_or_else(not_found)?;

    let rules_summary = rules_summary_for(&state, &game).await;
    let evaluation =
        score_submission(state.llm.as_ref(), &game, &rules_summary, &edited_article).await?;

    Ok(Json(evaluation))
}

/// POST /api/hint
///
/// Returns one non-revealing hint about the game's errors.
pub async fn handle_hint(
    State(state): State<AppState>,
    AppJson(request): AppJson<HintRequest>,
) -> Result<Json<HintResponse>, AppError> {
    let invalid = || AppError::Validation("Invalid gameId".to_string());

    let game_id = id_text(request.game_id)
        .as_deref()
        .and_then(parse_id)
        .ok_or_else(invalid)?;
    let game = state.games.get(&game_id).await.ok_or_else(invalid)?;

    let rules_summary = rules_summary_for(&state, &game).await;
    let hint = generate_hint(state.llm.as_ref(), &game, &rules_summary).await?;

    Ok(Json(HintResponse { hint }))
}

/// The rules of the game's style guide. The reference is not enforced, so a
/// missing guide degrades to a placeholder instead of failing the request.
async fn rules_summary_for(state: &AppState, game: &Game) -> String {
    match state.style_guides.get(&game.style_guide_id).await {
        Some(guide) => guide.rules_summary.clone(),
        None => {
            warn!(
                "Style guide {} for game {} is missing",
                game.style_guide_id, game.id
            );
            MISSING_RULES_PLACEHOLDER.to_string()
        }
    }
}
