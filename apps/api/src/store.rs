//! In-memory stores for style guides and games.
//!
//! Constructed once at startup and shared through `AppState`. Nothing is
//! persisted; a restart starts from empty maps.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Game, StyleGuide};

/// Records that carry their own key.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for StyleGuide {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Game {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// A cloneable handle to a shared `Uuid`-keyed map.
/// Locks are held only for the map operation itself.
#[derive(Debug)]
pub struct MemoryStore<T> {
    inner: Arc<RwLock<HashMap<Uuid, Arc<T>>>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Keyed> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its own key and returns the shared copy.
    pub async fn insert(&self, record: T) -> Arc<T> {
        let record = Arc::new(record);
        self.inner
            .write()
            .await
            .insert(record.key(), Arc::clone(&record));
        record
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<T>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

pub type StyleGuideStore = MemoryStore<StyleGuide>;
pub type GameStore = MemoryStore<Game>;

/// Parses a client-supplied identifier. Anything that is not a UUID cannot be
/// a key in either store, so callers treat `None` as "unknown".
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
