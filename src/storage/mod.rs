//! Saved-list persistence.
//!
//! The list lives behind an injected repository with an explicit load/save
//! contract; the recommendation core never touches it. Two implementations:
//! an in-memory store (default, and what tests use) and a JSON document on
//! disk keyed like the original client-side store.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::AppResult,
    models::{MediaType, SavedItem},
};

pub mod file;
pub mod memory;

pub use file::FileListRepository;
pub use memory::MemoryListRepository;

/// Document key the saved-items array is stored under
pub const LIST_STORAGE_KEY: &str = "cinemood-list";

/// Load/save contract for the saved-items list
#[async_trait::async_trait]
pub trait ListRepository: Send + Sync {
    async fn load(&self) -> AppResult<Vec<SavedItem>>;
    async fn save(&self, items: &[SavedItem]) -> AppResult<()>;
}

/// List operations over an injected repository.
///
/// Mutations run load-modify-save under a lock so concurrent requests cannot
/// interleave their writes.
#[derive(Clone)]
pub struct ListService {
    repository: Arc<dyn ListRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl ListService {
    pub fn new(repository: Arc<dyn ListRepository>) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All saved items, in insertion order
    pub async fn items(&self) -> AppResult<Vec<SavedItem>> {
        self.repository.load().await
    }

    /// Saved items of one media type
    pub async fn filtered(&self, media_type: MediaType) -> AppResult<Vec<SavedItem>> {
        let items = self.repository.load().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.media_type == media_type)
            .collect())
    }

    /// Adds an item unless its id is already present. Returns whether the
    /// list changed.
    pub async fn add(&self, item: SavedItem) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.repository.load().await?;
        if items.iter().any(|saved| saved.id == item.id) {
            return Ok(false);
        }
        items.push(item);
        self.repository.save(&items).await?;
        Ok(true)
    }

    /// Removes the item with the given id. Returns whether the list changed.
    pub async fn remove(&self, id: &str) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.repository.load().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.repository.save(&items).await?;
        Ok(true)
    }

    pub async fn contains(&self, id: &str) -> AppResult<bool> {
        let items = self.repository.load().await?;
        Ok(items.iter().any(|item| item.id == id))
    }
}
