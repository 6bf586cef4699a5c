//! JSON-file persistence for the session cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use campora_application::{CacheKey, SessionVault};
use campora_core::{AppError, AppResult};
use tokio::sync::RwLock;
use tracing::warn;

/// Session vault persisted as a single JSON object file.
///
/// The file models one shared storage area: keys this crate never wrote
/// may appear in it, and `clear` drops those too. Every mutation rewrites
/// the whole file through a temp-file-and-rename so a crash mid-write
/// never leaves a torn file behind.
pub struct FileSessionVault {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileSessionVault {
    /// Opens the vault at a path, loading any existing state.
    ///
    /// A missing file starts empty; a corrupt file is logged and also
    /// starts empty, since every cached value is re-creatable by logging
    /// in again.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|error| {
                    AppError::Storage(format!(
                        "failed to create session directory '{}': {error}",
                        parent.display()
                    ))
                })?;
            }
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "session file is corrupt; starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => {
                return Err(AppError::Storage(format!(
                    "failed to read session file '{}': {error}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> AppResult<()> {
        let raw = serde_json::to_string(entries).map_err(|error| {
            AppError::Storage(format!("failed to serialize session file: {error}"))
        })?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, raw.as_bytes())
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to write session file '{}': {error}",
                    temp_path.display()
                ))
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to replace session file '{}': {error}",
                    self.path.display()
                ))
            })
    }
}

#[async_trait]
impl SessionVault for FileSessionVault {
    async fn put(&self, key: CacheKey, value: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.as_str().to_owned(), value.to_owned());
        self.persist(&entries).await
    }

    async fn get(&self, key: CacheKey) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key.as_str()).cloned())
    }

    async fn remove(&self, key: CacheKey) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.persist(&entries).await
    }

    async fn clear(&self) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.persist(&entries).await
    }
}
