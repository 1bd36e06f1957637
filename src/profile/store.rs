use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::profile::profile_model::Profile;

pub const DEFAULT_PROFILE_KEY: &str = "profile";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage holds invalid JSON ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// KeyValueStore: persistent storage seam
// ============================================================================

/// Namespaced persistent storage. Values are replaced wholesale on `set`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `None` when the key was never set or has been removed.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, StoreError> {
        self.values
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// All keys live in one JSON object file. Writes go to a sibling temp file
/// that is then renamed over the original.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::Json {
            context: self.path.display().to_string(),
            source: e,
        })
    }

    async fn write_all(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(values).map_err(|e| StoreError::Json {
            context: self.path.display().to_string(),
            source: e,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await.map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value);
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.read_all().await?;
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}

// ============================================================================
// ProfileStore: the single stored profile
// ============================================================================

pub struct ProfileStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_PROFILE_KEY)
    }

    pub fn with_key(backend: S, key: &str) -> Self {
        ProfileStore {
            backend,
            key: key.to_string(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub async fn load(&self) -> Result<Option<Profile>, StoreError> {
        match self.backend.get(&self.key).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Json {
                    context: format!("stored profile '{}'", self.key),
                    source: e,
                }),
        }
    }

    /// Replace the stored profile.
    pub async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let value = serde_json::to_value(profile).map_err(|e| StoreError::Json {
            context: format!("profile '{}'", self.key),
            source: e,
        })?;
        self.backend.set(&self.key, value).await?;
        debug!(key = %self.key, entries = profile.len(), "profile saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(&self.key).await?;
        debug!(key = %self.key, "profile removed");
        Ok(())
    }
}
