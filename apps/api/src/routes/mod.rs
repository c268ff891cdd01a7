pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::game::handlers as game;
use crate::state::AppState;
use crate::style_guide::handlers as style_guide;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Style guides
        .route(
            "/api/style-guides",
            post(style_guide::handle_create_style_guide),
        )
        .route(
            "/api/style-guides/:id",
            get(style_guide::handle_get_style_guide),
        )
        // Games
        .route("/api/generate-article", post(game::handle_generate_article))
        .route("/api/submit-edits", post(game::handle_submit_edits))
        .route("/api/hint", post(game::handle_hint))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::models::{ArticleSource, ErrorDescriptor, ErrorRecord, Game, StyleGuide};

    const ARTICLE_REPLY: &str = r#"{
        "article": "The council voted 5-4 on Tuesday, Jan 5th, to aprove the budget.",
        "errors": [
            {"id": "e1", "error_type": "style_guide", "category": "date_format",
             "rule_description": "No ordinals", "original_text": "Jan 5th",
             "suggested_correction": "Jan. 5", "explanation": "AP dates."},
            {"id": "e2", "error_type": "spelling", "category": "spelling",
             "rule_description": "Spelling", "original_text": "aprove",
             "suggested_correction": "approve", "explanation": "Typo."}
        ]
    }"#;

    fn state_with(model: ScriptedModel) -> (AppState, Arc<ScriptedModel>) {
        let model = Arc::new(model);
        (AppState::new(model.clone()), model)
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn seed_game(state: &AppState) -> Game {
        let guide = state
            .style_guides
            .insert(StyleGuide::new(
                "AP".to_string(),
                "raw".to_string(),
                "Use Jan. 5, not Jan 5th.".to_string(),
            ))
            .await;
        let game = Game::new(
            guide.id,
            ArticleSource::Generated,
            "Alot of voters came.".to_string(),
            vec![
                ErrorRecord::located(
                    ErrorDescriptor {
                        id: "e1".to_string(),
                        original_text: "Alot".to_string(),
                        ..Default::default()
                    },
                    0,
                    4,
                ),
                ErrorRecord::unlocated(ErrorDescriptor {
                    id: "e2".to_string(),
                    original_text: "missing".to_string(),
                    ..Default::default()
                }),
            ],
        );
        (*state.games.insert(game).await).clone()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = state_with(ScriptedModel::default());
        let (status, body) = send(build_router(state), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["games"], 0);
    }

    #[tokio::test]
    async fn test_style_guide_create_then_fetch() {
        let (state, _) = state_with(ScriptedModel::replying([
            r#"{"summary": "- Abbreviate months."}"#,
        ]));
        let app = build_router(state);

        let (status, created) = send(
            app.clone(),
            Method::POST,
            "/api/style-guides",
            Some(json!({"name": "AP", "text": "Abbreviate Jan., Feb., Aug."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["rulesSummary"], "- Abbreviate months.");

        let id = created["styleGuideId"].as_str().unwrap();
        let (status, fetched) =
            send(app, Method::GET, &format!("/api/style-guides/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "AP");
        assert_eq!(fetched["styleGuideId"], id);
        assert_eq!(fetched["rulesSummary"], "- Abbreviate months.");
    }

    #[tokio::test]
    async fn test_style_guide_missing_fields_is_400() {
        let (state, model) = state_with(ScriptedModel::default());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/style-guides",
            Some(json!({"name": "AP", "text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Name and text are required"}));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_style_guide_upstream_failure_is_500() {
        let (state, _) = state_with(ScriptedModel::default());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/style-guides",
            Some(json!({"name": "AP", "text": "rules"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_style_guide_is_404() {
        let (state, _) = state_with(ScriptedModel::default());
        let app = build_router(state);
        let (status, body) = send(
            app.clone(),
            Method::GET,
            &format!("/api/style-guides/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Style guide not found"}));

        let (status, _) = send(app, Method::GET, "/api/style-guides/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_article_end_to_end() {
        let (state, model) = state_with(ScriptedModel::replying([ARTICLE_REPLY]));
        let guide = state
            .style_guides
            .insert(StyleGuide::new(
                "AP".to_string(),
                "raw".to_string(),
                "rules".to_string(),
            ))
            .await;
        let app = build_router(state.clone());

        let (status, body) = send(
            app,
            Method::POST,
            "/api/generate-article",
            Some(json!({
                "styleGuideId": guide.id,
                "length": "short",
                "numErrors": 2,
                "subject": "Local government"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["start_char"], 34);
        assert_eq!(errors[0]["end_char"], 41);
        assert_eq!(errors[1]["original_text"], "aprove");
        assert_eq!(errors[1]["start_char"], 46);

        let game_id = crate::store::parse_id(body["gameId"].as_str().unwrap()).unwrap();
        assert!(state.games.get(&game_id).await.is_some());

        let system = &model.requests()[0].system;
        assert!(system.contains("approximately 300 words"));
        assert!(system.contains("Subject: Local government"));
    }

    #[tokio::test]
    async fn test_generate_article_unknown_guide_is_400() {
        let (state, model) = state_with(ScriptedModel::default());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/generate-article",
            Some(json!({"styleGuideId": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid styleGuideId"}));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_generate_article_malformed_reply_is_500() {
        let (state, _) = state_with(ScriptedModel::replying([r#"{"article": "Text only."}"#]));
        let guide = state
            .style_guides
            .insert(StyleGuide::new(
                "AP".to_string(),
                "raw".to_string(),
                "rules".to_string(),
            ))
            .await;
        let (status, body) = send(
            build_router(state.clone()),
            Method::POST,
            "/api/generate-article",
            Some(json!({"styleGuideId": guide.id})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid response format from model");
        assert_eq!(state.games.len().await, 0);
    }

    #[tokio::test]
    async fn test_submit_edits_unknown_game_is_404() {
        let (state, _) = state_with(ScriptedModel::default());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/submit-edits",
            Some(json!({"gameId": uuid::Uuid::new_v4(), "editedArticle": "Edited."})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Game not found"}));
    }

    #[tokio::test]
    async fn test_submit_edits_missing_fields_is_400() {
        let (state, _) = state_with(ScriptedModel::default());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/submit-edits",
            Some(json!({"gameId": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "gameId and editedArticle are required"}));
    }

    #[tokio::test]
    async fn test_submit_edits_recounts_score() {
        let (state, _) = state_with(ScriptedModel::replying([r#"{
            "score": {"foundErrors": 2, "totalErrors": 2, "percentage": 100},
            "perError": [
                {"id": "e1", "fixed": true, "comment": "Fixed."},
                {"id": "e2", "fixed": false, "comment": "Still there."}
            ],
            "overallFeedback": "Solid start."
        }"#]));
        let game = seed_game(&state).await;

        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/submit-edits",
            Some(json!({"gameId": game.id, "editedArticle": "A lot of voters came."})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["score"],
            json!({"foundErrors": 1, "totalErrors": 2, "percentage": 50})
        );
        assert_eq!(body["perError"][1]["comment"], "Still there.");
        assert_eq!(body["overallFeedback"], "Solid start.");
    }

    #[tokio::test]
    async fn test_hint_end_to_end() {
        let (state, model) = state_with(ScriptedModel::replying([
            r#"{"hint": "Look at the first word."}"#,
        ]));
        let game = seed_game(&state).await;

        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/hint",
            Some(json!({"gameId": game.id})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"hint": "Look at the first word."}));
        assert!(model.requests()[0].user.contains("Use Jan. 5, not Jan 5th."));
    }

    #[tokio::test]
    async fn test_hint_unknown_game_is_400() {
        let (state, _) = state_with(ScriptedModel::default());
        let app = build_router(state);

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/hint",
            Some(json!({"gameId": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid gameId"}));

        let (status, _) = send(app, Method::POST, "/api/hint", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_article_end_to_end() {
        let submitted = "Alot of voters came on Jan 5th.";
        let (state, model) = state_with(ScriptedModel::replying([r#"{
            "article": "A lot of voters came on Jan. 5.",
            "errors": [
                {"id": "e1", "error_type": "spelling", "original_text": "Alot", "suggested_correction": null},
                {"id": "e2", "error_type": "style_guide", "original_text": "Jan 5th", "suggested_correction": "Jan. 5"}
            ]
        }"#]));
        let guide = state
            .style_guides
            .insert(StyleGuide::new(
                "AP".to_string(),
                "raw".to_string(),
                "rules".to_string(),
            ))
            .await;

        let (status, body) = send(
            build_router(state.clone()),
            Method::POST,
            "/api/generate-article",
            Some(json!({"styleGuideId": guide.id, "article": submitted})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"], submitted);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors[0]["start_char"], 0);
        assert_eq!(errors[0]["suggested_correction"], "");
        assert_eq!(errors[1]["start_char"], 23);
        assert_eq!(errors[1]["end_char"], 30);

        let game_id = crate::store::parse_id(body["gameId"].as_str().unwrap()).unwrap();
        let game = state.games.get(&game_id).await.unwrap();
        assert_eq!(game.source, ArticleSource::Analyzed);

        let request = &model.requests()[0];
        assert!(request.user.contains(submitted));
        assert!(!request.system.contains("approximately"));
    }

    #[tokio::test]
    async fn test_numeric_game_id_is_unknown_game() {
        let (state, model) = state_with(ScriptedModel::default());
        let app = build_router(state);

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/submit-edits",
            Some(json!({"gameId": 42, "editedArticle": "Edited."})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Game not found"}));

        let (status, body) =
            send(app, Method::POST, "/api/hint", Some(json!({"gameId": 42}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid gameId"}));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_400_with_error_shape() {
        let (state, _) = state_with(ScriptedModel::default());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/hint")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }
}
