use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Offset value for an error whose text could not be placed in the article.
pub const UNLOCATED: i64 = -1;

/// An error as described by the model, before offsets are attached.
///
/// Every field defaults to empty so a sloppy reply still yields a record:
/// missing and `null` fields become `""`, and scalars are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub error_type: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub category: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub rule_description: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub original_text: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub suggested_correction: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub explanation: String,
}

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// One entry of a game's answer key: the descriptor plus its character span
/// in the article. Both offsets are [`UNLOCATED`] when no span was claimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(flatten)]
    pub descriptor: ErrorDescriptor,
    pub start_char: i64,
    pub end_char: i64,
}

impl ErrorRecord {
    pub fn located(descriptor: ErrorDescriptor, start: usize, end: usize) -> Self {
        Self {
            descriptor,
            start_char: start as i64,
            end_char: end as i64,
        }
    }

    pub fn unlocated(descriptor: ErrorDescriptor) -> Self {
        Self {
            descriptor,
            start_char: UNLOCATED,
            end_char: UNLOCATED,
        }
    }

    pub fn is_located(&self) -> bool {
        self.start_char != UNLOCATED
    }
}

/// Where a game's article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSource {
    /// Written by the model with seeded errors.
    Generated,
    /// Supplied by the user and checked by the model.
    Analyzed,
}

/// One practice round: an article and its answer key. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    /// Not checked against the style guide store after creation.
    pub style_guide_id: Uuid,
    pub source: ArticleSource,
    pub article: String,
    pub errors: Vec<ErrorRecord>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(
        style_guide_id: Uuid,
        source: ArticleSource,
        article: String,
        errors: Vec<ErrorRecord>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            style_guide_id,
            source,
            article,
            errors,
            created_at: Utc::now(),
        }
    }
}
