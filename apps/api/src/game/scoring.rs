//! Submission scoring.
//!
//! The model judges each answer-key error as fixed or not. Its arithmetic is
//! not trusted: the score is recounted from its own per-error verdicts and the
//! recount wins whenever the two disagree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::game::prompts::{SCORING_SYSTEM, SCORING_USER_TEMPLATE};
use crate::llm_client::prompts::{fill, with_json_instruction};
use crate::llm_client::{call_decoded, ChatModel, ChatRequest, EVAL_MODEL};
use crate::models::{ErrorDescriptor, Game};

const SCORING_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub found_errors: u32,
    pub total_errors: u32,
    pub percentage: u32,
}

impl Score {
    /// The score implied by a verdict list.
    pub fn recount(verdicts: &[ErrorVerdict]) -> Self {
        let found = verdicts.iter().filter(|v| v.fixed).count() as u32;
        let total = verdicts.len() as u32;
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(found) / f64::from(total) * 100.0).round() as u32
        };
        Self {
            found_errors: found,
            total_errors: total,
            percentage,
        }
    }
}

/// The model's tally as reported. Numbers are kept loose so a fractional
/// percentage does not sink the whole evaluation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportedScore {
    found_errors: Option<f64>,
    total_errors: Option<f64>,
    percentage: Option<f64>,
}

impl ReportedScore {
    fn agrees_with(&self, recount: &Score) -> bool {
        let same = |reported: Option<f64>, expected: u32| {
            reported.is_some_and(|r| (r - f64::from(expected)).abs() < 0.5)
        };
        same(self.found_errors, recount.found_errors)
            && same(self.total_errors, recount.total_errors)
            && same(self.percentage, recount.percentage)
    }

    fn into_score(self) -> Score {
        let whole = |v: Option<f64>| v.map_or(0, |n| n.round().max(0.0) as u32);
        Score {
            found_errors: whole(self.found_errors),
            total_errors: whole(self.total_errors),
            percentage: whole(self.percentage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorVerdict {
    #[serde(default)]
    pub id: Value,
    /// Anything other than JSON `true` counts as not fixed.
    #[serde(default, deserialize_with = "strict_true")]
    pub fixed: bool,
    #[serde(default)]
    pub comment: String,
}

fn strict_true<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationReply {
    score: Option<ReportedScore>,
    per_error: Option<Vec<ErrorVerdict>>,
    #[serde(default)]
    overall_feedback: String,
}

/// The evaluation returned to the player.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: Score,
    pub per_error: Vec<ErrorVerdict>,
    pub overall_feedback: String,
}

/// Applies the recount. Without a verdict list there is nothing to recount
/// against, so the reported tally passes through.
fn reconcile(reply: EvaluationReply) -> Evaluation {
    let Some(per_error) = reply.per_error else {
        warn!("Evaluation has no perError list; score left as reported");
        return Evaluation {
            score: reply.score.unwrap_or_default().into_score(),
            per_error: Vec::new(),
            overall_feedback: reply.overall_feedback,
        };
    };

    let recount = Score::recount(&per_error);
    let score = match reply.score {
        Some(reported) if reported.agrees_with(&recount) => recount,
        reported => {
            warn!(
                "Score mismatch detected. Reported: {:?}, Actual: {:?}",
                reported, recount
            );
            recount
        }
    };

    Evaluation {
        score,
        per_error,
        overall_feedback: reply.overall_feedback,
    }
}

/// Asks the model to grade `edited_article` against the game's answer key.
pub async fn score_submission(
    llm: &dyn ChatModel,
    game: &Game,
    rules_summary: &str,
    edited_article: &str,
) -> Result<Evaluation, AppError> {
    // Offsets are presentation data; the judge only needs the descriptors.
    let answer_key: Vec<&ErrorDescriptor> = game.errors.iter().map(|e| &e.descriptor).collect();
    let answer_key = serde_json::to_string_pretty(&answer_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize answer key: {e}")))?;

    let system = with_json_instruction(SCORING_SYSTEM);
    let user = fill(
        SCORING_USER_TEMPLATE,
        &[
            ("rules_summary", rules_summary),
            ("article", &game.article),
            ("answer_key", &answer_key),
            ("edited_article", edited_article),
        ],
    );

    let request = ChatRequest {
        model: EVAL_MODEL,
        system: &system,
        user: &user,
        temperature: SCORING_TEMPERATURE,
    };

    let reply: EvaluationReply = call_decoded(llm, request).await.require(
        |_| AppError::Llm("Failed to parse evaluation data from model response".to_string()),
        |e| AppError::Llm(format!("Evaluation request failed: {e}")),
    )?;

    let evaluation = reconcile(reply);
    info!(
        "Scored game {}: {}/{} ({}%)",
        game.id,
        evaluation.score.found_errors,
        evaluation.score.total_errors,
        evaluation.score.percentage
    );

    Ok(evaluation)
}
