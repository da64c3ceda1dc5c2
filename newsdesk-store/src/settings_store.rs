//! File-backed settings blob store.
//!
//! Stores a key -> blob map as one JSON file. The production deployment
//! keeps the blob in a site-settings table instead; both sit behind
//! [`SettingsBlobStore`] so the registry merge never notices the
//! difference.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};
use crate::traits::SettingsBlobStore;

/// Settings blob store persisted as a single JSON file.
pub struct FileSettingsStore {
    path: PathBuf,
    blobs: RwLock<HashMap<String, String>>,
}

impl FileSettingsStore {
    /// Opens the store at the default path.
    pub async fn open_default() -> Self {
        Self::open(default_settings_path()).await
    }

    /// Opens the store at `path`. A missing or unreadable file starts the
    /// store empty; the settings consumer falls back to built-in defaults
    /// in that case, so this never fails.
    pub async fn open(path: PathBuf) -> Self {
        let blobs = if path.exists() {
            match load_json(&path).await {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load settings file, starting empty");
                    HashMap::new()
                }
            }
        } else {
            debug!(path = %path.display(), "Settings file not found, starting empty");
            HashMap::new()
        };

        Self {
            path,
            blobs: RwLock::new(blobs),
        }
    }
}

#[async_trait]
impl SettingsBlobStore for FileSettingsStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(key.to_string(), value.to_string());
        save_json(&self.path, &*blobs).await
    }
}

// ============================================================================
// Tests
// ============================================================================
