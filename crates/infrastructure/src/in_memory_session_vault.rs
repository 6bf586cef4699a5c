//! In-memory session vault for tests and short-lived tools.

use std::collections::HashMap;

use async_trait::async_trait;
use campora_application::{CacheKey, SessionVault};
use campora_core::AppResult;
use tokio::sync::RwLock;

/// Session vault that keeps every entry in process memory.
///
/// Nothing survives a restart, so this adapter suits tests and one-shot
/// commands that log in, act, and exit.
#[derive(Default)]
pub struct InMemorySessionVault {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionVault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionVault for InMemorySessionVault {
    async fn put(&self, key: CacheKey, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.as_str().to_owned(), value.to_owned());
        Ok(())
    }

    async fn get(&self, key: CacheKey) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key.as_str()).cloned())
    }

    async fn remove(&self, key: CacheKey) -> AppResult<()> {
        self.entries.write().await.remove(key.as_str());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
