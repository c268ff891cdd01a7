use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A processed style guide. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleGuide {
    pub id: Uuid,
    pub name: String,
    pub raw_text: String,
    pub rules_summary: String,
    pub created_at: DateTime<Utc>,
}

impl StyleGuide {
    pub fn new(name: String, raw_text: String, rules_summary: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            raw_text,
            rules_summary,
            created_at: Utc::now(),
        }
    }
}
