//! Persistence adapter: reads the CV once at startup, writes it after every mutation.
//!
//! The record lives under one fixed key in an async key-value backend.
//! There is no schema version; a record that no longer parses is treated the
//! same as a missing one and replaced by the default document.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::cv::CvDocument;

pub mod file_store;
pub mod memory_store;
pub mod redis_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

/// The single key the CV record is stored under.
pub const STORAGE_KEY: &str = "cv-data";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value backend, the shape of browser local storage.
///
/// Implementations must not block the async worker: network backends use an
/// async client, filesystem writes go through `spawn_blocking`.
#[async_trait]
pub trait KeyValueStore: Send {
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Opens the backend named by `storage_url`.
///
/// `redis://` / `rediss://` URLs select Redis, `memory:` an in-process map,
/// anything else is a directory for [`FileStore`].
pub async fn open_backend(storage_url: &str) -> Result<Box<dyn KeyValueStore>, StorageError> {
    if storage_url.starts_with("redis://") || storage_url.starts_with("rediss://") {
        info!("Using Redis storage backend");
        return Ok(Box::new(RedisStore::connect(storage_url).await?));
    }
    if storage_url == "memory:" {
        info!("Using in-memory storage backend (nothing survives a restart)");
        return Ok(Box::new(MemoryStore::new()));
    }
    info!("Using file storage backend at {storage_url}");
    Ok(Box::new(FileStore::open(storage_url)?))
}

/// Load/save channel for the CV record. Holds no copy of the document.
pub struct DocumentRepository {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl DocumentRepository {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Reads the stored record, falling back to a fresh default document when
    /// the record is absent, unreadable or fails to parse.
    pub async fn load(&mut self) -> CvDocument {
        let raw = match self.backend.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored CV under '{}', starting empty", self.key);
                return CvDocument::default();
            }
            Err(e) => {
                warn!("Failed to read stored CV, starting empty: {e}");
                return CvDocument::default();
            }
        };

        match serde_json::from_str::<CvDocument>(&raw) {
            Ok(document) => document,
            Err(e) => {
                warn!("Stored CV is corrupt, replacing with defaults: {e}");
                CvDocument::default()
            }
        }
    }

    /// Serializes the whole document and overwrites the stored record.
    pub async fn save(&mut self, document: &CvDocument) -> Result<(), StorageError> {
        let raw = serde_json::to_string(document)?;
        self.backend.set(&self.key, &raw).await
    }
}
