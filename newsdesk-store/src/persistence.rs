//! JSON file persistence helpers.
//!
//! The settings blob can carry API credentials, so files are written with
//! owner-only permissions.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - Linux: `~/.config/newsdesk`
/// - macOS: `~/Library/Application Support/newsdesk`
/// - Windows: `%APPDATA%\newsdesk`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("newsdesk"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// Load / Save
// ============================================================================

/// Loads a JSON value from `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = tokio::fs::read(path).await?;
    let value = serde_json::from_slice(&bytes)?;
    debug!(path = %path.display(), "Loaded JSON");
    Ok(value)
}

/// Saves a JSON value to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error when the value cannot be serialized or written.
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await?;
    set_restrictive_permissions(path).await?;
    debug!(path = %path.display(), "Saved JSON");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("blob.json");

        let mut map = HashMap::new();
        map.insert("ai_settings".to_string(), "{}".to_string());

        save_json(&path, &map).await.unwrap();
        let loaded: HashMap<String, String> = load_json(&path).await.unwrap();
        assert_eq!(loaded, map);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.json");
        save_json(&path, &serde_json::json!({"k": "v"})).await.unwrap();

        let mode = tokio::fs::metadata(&path).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let result: Result<HashMap<String, String>, _> = load_json(&path).await;
        assert!(result.is_err());
    }
}
