//! File storage for course covers, logos and profile documents.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AppError;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), AppError>;
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, AppError>;
    async fn delete(&self, path: &str) -> Result<bool, AppError>;

    /// Public URL a browser can load the file from.
    fn url(&self, path: &str) -> String;
}

/// Rejects absolute paths and `..` so keys stay inside the storage root.
fn relative_key(path: &str) -> Result<PathBuf, AppError> {
    let key = Path::new(path);
    let clean = key
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if path.is_empty() || !clean {
        return Err(AppError::Storage(format!("invalid storage path {:?}", path)));
    }
    Ok(key.to_path_buf())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Stores files on the local disk under `root`.
pub struct LocalStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), AppError> {
        let full = self.root.join(relative_key(path)?);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        debug!("stored {} bytes at {}", bytes.len(), full.display());
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, AppError> {
        let full = self.root.join(relative_key(path)?);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, AppError> {
        let full = self.root.join(relative_key(path)?);
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(e.to_string())),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.public_url, path)
    }
}

/// Keeps files in a map. Handy for tests and demo runs.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, AppError> {
        self.files
            .lock()
            .map_err(|_| AppError::Storage("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), AppError> {
        relative_key(path)?;
        self.files()?.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.files()?.get(path).cloned())
    }

    async fn delete(&self, path: &str) -> Result<bool, AppError> {
        Ok(self.files()?.remove(path).is_some())
    }

    fn url(&self, path: &str) -> String {
        join_url("/storage", path)
    }
}
