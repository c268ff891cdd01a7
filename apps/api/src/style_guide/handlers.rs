//! Axum route handlers for the Style Guide API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{non_blank, AppJson};
use crate::state::AppState;
use crate::store::parse_id;
use crate::style_guide::summarizer::create_style_guide;

#[derive(Debug, Deserialize)]
pub struct CreateStyleGuideRequest {
    pub name: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStyleGuideResponse {
    pub style_guide_id: Uuid,
    pub rules_summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleGuideResponse {
    pub style_guide_id: Uuid,
    pub name: String,
    pub rules_summary: String,
}

/// POST /api/style-guides
///
/// Summarizes the submitted guide into prescriptive rules and stores it.
pub async fn handle_create_style_guide(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateStyleGuideRequest>,
) -> Result<Json<CreateStyleGuideResponse>, AppError> {
    let (Some(name), Some(text)) = (non_blank(request.name), non_blank(request.text)) else {
        return Err(AppError::Validation(
            "Name and text are required".to_string(),
        ));
    };

    let guide = create_style_guide(state.llm.as_ref(), &state.style_guides, name, text).await?;

    Ok(Json(CreateStyleGuideResponse {
        style_guide_id: guide.id,
        rules_summary: guide.rules_summary,
    }))
}

/// GET /api/style-guides/:id
pub async fn handle_get_style_guide(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StyleGuideResponse>, AppError> {
    let not_found = || AppError::NotFound("Style guide not found".to_string());

    let id = parse_id(&id).ok_or_else(not_found)?;
    let guide = state.style_guides.get(&id).await.ok_or_else(not_found)?;

    Ok(Json(StyleGuideResponse {
        style_guide_id: guide.id,
        name: guide.name.clone(),
        rules_summary: guide.rules_summary.clone(),
    }))
}
