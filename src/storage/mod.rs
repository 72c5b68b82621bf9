//! Filesystem layout and JSON document IO.
//!
//! Handles reading and writing the local data directory:
//! - Cached source tables (pipe-delimited CSV)
//! - Generated reference documents (one JSON file per faction, plus the
//!   faction index and the core stratagems)

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

/// File name of the faction index document.
pub const INDEX_FILE: &str = "index.json";

/// File name of the faction-less stratagem document.
pub const CORE_STRATAGEMS_FILE: &str = "core-stratagems.json";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Downloaded source tables.
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    /// Generated reference documents.
    pub fn reference_dir(&self) -> PathBuf {
        self.data_dir.join("reference")
    }

    pub fn index_path(&self) -> PathBuf {
        self.reference_dir().join(INDEX_FILE)
    }

    pub fn core_stratagems_path(&self) -> PathBuf {
        self.reference_dir().join(CORE_STRATAGEMS_FILE)
    }

    pub fn faction_path(&self, faction_id: &str) -> PathBuf {
        self.reference_dir().join(faction_file_name(faction_id))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// File name for a faction document, e.g. `"SM.json"`.
pub fn faction_file_name(faction_id: &str) -> String {
    format!("{}.json", faction_id)
}

/// Write a value as JSON, creating parent directories.
pub async fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    tokio::fs::write(path, json).await?;

    debug!("Wrote {:?}", path);
    Ok(())
}

/// Read a JSON document.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.cache_dir(), PathBuf::from("/data/cache"));
        assert_eq!(config.reference_dir(), PathBuf::from("/data/reference"));
        assert_eq!(
            config.index_path(),
            PathBuf::from("/data/reference/index.json")
        );
        assert_eq!(
            config.core_stratagems_path(),
            PathBuf::from("/data/reference/core-stratagems.json")
        );
        assert_eq!(
            config.faction_path("AC"),
            PathBuf::from("/data/reference/AC.json")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[tokio::test]
    async fn test_json_round_trip_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("doc.json");

        write_json(&path, &vec!["a", "b"], true).await.unwrap();
        let back: Vec<String> = read_json(&path).await.unwrap();

        assert_eq!(back, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result: Result<Vec<String>, _> = read_json(&temp_dir.path().join("none.json")).await;

        assert!(matches!(result, Err(StorageError::PathNotFound(_))));
    }
}
