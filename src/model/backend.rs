//! Storage backends for the subscriber list.
//!
//! The store never caches: every request goes through `load`, and every successful
//! subscription through `save` with the full list.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::record::SubscriberList;

// ###################################
// ->   TRAIT
// ###################################
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Makes sure an (empty) store exists. Existing data is left untouched.
    async fn init(&self) -> BackendResult<()>;
    async fn load(&self) -> BackendResult<SubscriberList>;
    /// Replaces the persisted contents with `list`.
    async fn save(&self, list: &SubscriberList) -> BackendResult<()>;
}

// ###################################
// ->   JSON FILE
// ###################################
/// Keeps the whole list in a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Writes to a sibling file first and renames it over the target,
    /// readers see either the old or the new list.
    async fn write_atomic(&self, bytes: &[u8]) -> BackendResult<()> {
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for JsonFileBackend {
    async fn init(&self) -> BackendResult<()> {
        if tokio::fs::try_exists(&self.path).await? {
            debug!("{:<20} - {}", "Using existing store", self.path.display());
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        self.save(&SubscriberList::default()).await?;
        info!("{:<20} - {}", "Created empty store", self.path.display());

        Ok(())
    }

    async fn load(&self) -> BackendResult<SubscriberList> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            // Nothing was ever written.
            Err(er) if er.kind() == ErrorKind::NotFound => return Ok(SubscriberList::default()),
            Err(er) => return Err(er.into()),
        };

        let list = serde_json::from_slice(&bytes)?;
        Ok(list)
    }

    async fn save(&self, list: &SubscriberList) -> BackendResult<()> {
        let bytes = serde_json::to_vec_pretty(list)?;
        self.write_atomic(&bytes).await?;
        debug!(count = list.len(), "Saved subscriber list");
        Ok(())
    }
}

// ###################################
// ->   IN MEMORY
// ###################################
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    list: Mutex<SubscriberList>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryBackend {
    async fn init(&self) -> BackendResult<()> {
        Ok(())
    }

    async fn load(&self) -> BackendResult<SubscriberList> {
        Ok(self.list.lock().await.clone())
    }

    async fn save(&self, list: &SubscriberList) -> BackendResult<()> {
        *self.list.lock().await = list.clone();
        Ok(())
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type BackendResult<T> = core::result::Result<T, BackendError>;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
