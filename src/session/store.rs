//! Persistent key-value storage collaborator.
//!
//! The session manager is the only writer of the session keys. The trait
//! is deliberately narrow: opaque string values under opaque string keys,
//! whatever persistent mechanism the platform offers underneath.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::utils::errors::ApiError;

/// Store key holding the bearer credential string.
pub const SESSION_TOKEN_KEY: &str = "session.token";
/// Store key holding the serialized identity record.
pub const SESSION_IDENTITY_KEY: &str = "session.identity";

/// Device/browser persistent key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    async fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// Volatile in-memory store. Useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::sync::Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// File-backed store persisting all entries as one JSON object.
///
/// Writes are serialized through an internal lock; the session manager is
/// the only writer in practice, so contention does not occur.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: tokio::sync::Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_entries(&self) -> Result<HashMap<String, String>, ApiError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(ApiError::storage),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(ApiError::storage(err)),
        }
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), ApiError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(ApiError::storage)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(ApiError::storage)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let _guard = self.guard.lock().await;
        Ok(self.read_entries().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let _guard = self.guard.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        let _guard = self.guard.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);

        store.set(SESSION_TOKEN_KEY, "tok1").await.unwrap();
        assert_eq!(
            store.get(SESSION_TOKEN_KEY).await.unwrap(),
            Some("tok1".to_string())
        );

        store.remove(SESSION_TOKEN_KEY).await.unwrap();
        assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::new(&path);
        store.set(SESSION_TOKEN_KEY, "tok1").await.unwrap();
        store.set(SESSION_IDENTITY_KEY, r#"{"id":"u1"}"#).await.unwrap();
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get(SESSION_TOKEN_KEY).await.unwrap(),
            Some("tok1".to_string())
        );
        assert_eq!(
            reopened.get(SESSION_IDENTITY_KEY).await.unwrap(),
            Some(r#"{"id":"u1"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);
        // removing from an absent file is not an error
        store.remove(SESSION_TOKEN_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileStore::new(&path);
        let err = store.get(SESSION_TOKEN_KEY).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
