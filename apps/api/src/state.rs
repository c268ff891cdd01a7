use std::sync::Arc;

use crate::llm_client::ChatModel;
use crate::store::{GameStore, StyleGuideStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Production: `LlmClient`. Tests swap in a scripted model.
    pub llm: Arc<dyn ChatModel>,
    pub style_guides: StyleGuideStore,
    pub games: GameStore,
}

impl AppState {
    /// Fresh state with empty stores.
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self {
            llm,
            style_guides: StyleGuideStore::new(),
            games: GameStore::new(),
        }
    }
}
