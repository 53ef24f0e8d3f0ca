use tokio::sync::RwLock;

use crate::{error::AppResult, models::SavedItem};

use super::ListRepository;

/// In-memory list repository. The default when no list path is configured,
/// and the implementation tests run against.
#[derive(Default)]
pub struct MemoryListRepository {
    items: RwLock<Vec<SavedItem>>,
}

#[async_trait::async_trait]
impl ListRepository for MemoryListRepository {
    async fn load(&self) -> AppResult<Vec<SavedItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn save(&self, items: &[SavedItem]) -> AppResult<()> {
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}
