//! Durable key-value storage for the client session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::error::StorageError;

/// A small string key-value area scoped to the client runtime.
///
/// Multi-key writes and removals must be all-or-nothing so a token pair is
/// never observed half-replaced.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError>;
    async fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Process-memory storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items().get(key).cloned())
    }

    async fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.items();
        for (key, value) in items {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.items();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Storage backed by a JSON object on disk.
///
/// Every write replaces the whole file through a temp file and a rename.
/// Temp names are unique per process and write, so several instances may
/// share one path.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: tokio::sync::Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(
            "{}.{}.{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy(),
            std::process::id(),
            seq,
        );
        self.path.with_file_name(tmp_name)
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        let written = match tokio::fs::write(&tmp, serde_json::to_vec(map)?).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), "session storage written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        for (key, value) in items {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.store(&map).await
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        for key in keys {
            map.remove(*key);
        }
        self.store(&map).await
    }
}
