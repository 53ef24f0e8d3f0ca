use std::collections::HashMap;
use std::path::PathBuf;

use crate::{error::AppResult, models::SavedItem};

use super::{ListRepository, LIST_STORAGE_KEY};

/// File-backed list repository.
///
/// Persists a small JSON key-value document with the saved-items array under
/// the `"cinemood-list"` key, matching the layout of the original web
/// client's local store.
pub struct FileListRepository {
    path: PathBuf,
}

impl FileListRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl ListRepository for FileListRepository {
    async fn load(&self) -> AppResult<Vec<SavedItem>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut document: HashMap<String, Vec<SavedItem>> = serde_json::from_slice(&raw)?;
        Ok(document.remove(LIST_STORAGE_KEY).unwrap_or_default())
    }

    async fn save(&self, items: &[SavedItem]) -> AppResult<()> {
        let mut document = HashMap::new();
        document.insert(LIST_STORAGE_KEY, items);
        let raw = serde_json::to_vec_pretty(&document)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}
