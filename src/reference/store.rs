//! Where reference documents come from.
//!
//! Documents are static, pre-generated artifacts. They can be read from the
//! local reference directory or from any HTTP server hosting that directory.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::ReferenceError;
use crate::models::{FactionDocument, FactionSummary, Stratagem};
use crate::storage::{self, faction_file_name, StorageConfig, CORE_STRATAGEMS_FILE, INDEX_FILE};

/// Read-only access to the generated reference documents.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Store identifier for logging.
    fn name(&self) -> &str;

    /// The faction index.
    async fn index(&self) -> Result<Vec<FactionSummary>, ReferenceError>;

    /// One faction's document.
    async fn faction(&self, faction_id: &str) -> Result<FactionDocument, ReferenceError>;

    /// Stratagems available to every army.
    async fn core_stratagems(&self) -> Result<Vec<Stratagem>, ReferenceError>;
}

/// Reference documents in the local data directory.
pub struct DirectoryStore {
    storage: StorageConfig,
}

impl DirectoryStore {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ReferenceStore for DirectoryStore {
    fn name(&self) -> &str {
        "directory"
    }

    async fn index(&self) -> Result<Vec<FactionSummary>, ReferenceError> {
        Ok(storage::read_json(&self.storage.index_path()).await?)
    }

    async fn faction(&self, faction_id: &str) -> Result<FactionDocument, ReferenceError> {
        Ok(storage::read_json(&self.storage.faction_path(faction_id)).await?)
    }

    async fn core_stratagems(&self) -> Result<Vec<Stratagem>, ReferenceError> {
        Ok(storage::read_json(&self.storage.core_stratagems_path()).await?)
    }
}

/// Reference documents served over HTTP.
pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    /// `base_url` is the directory URL; a trailing slash is added if missing.
    pub fn new(client: Client, base_url: Url) -> Self {
        let base_url = if base_url.path().ends_with('/') {
            base_url
        } else {
            let mut url = base_url;
            let path = format!("{}/", url.path());
            url.set_path(&path);
            url
        };
        Self { client, base_url }
    }

    fn document_url(&self, file: &str) -> Result<Url, ReferenceError> {
        self.base_url
            .join(file)
            .map_err(|e| ReferenceError::InvalidUrl(e.to_string()))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T, ReferenceError> {
        let url = self.document_url(file)?;
        debug!("Fetching reference document {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ReferenceError::NotFound(file.to_string()));
        }
        if !status.is_success() {
            return Err(ReferenceError::HttpStatus {
                status: status.as_u16(),
                document: file.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ReferenceStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn index(&self) -> Result<Vec<FactionSummary>, ReferenceError> {
        self.get(INDEX_FILE).await
    }

    async fn faction(&self, faction_id: &str) -> Result<FactionDocument, ReferenceError> {
        self.get(&faction_file_name(faction_id)).await
    }

    async fn core_stratagems(&self) -> Result<Vec<Stratagem>, ReferenceError> {
        self.get(CORE_STRATAGEMS_FILE).await
    }
}
