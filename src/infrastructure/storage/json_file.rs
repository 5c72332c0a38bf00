//! Flat-file user record store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{UserRecord, UserRecordStore};
use crate::shared::StoreError;

/// Reads the user record from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct JsonFileUserStore {
    path: PathBuf,
}

impl JsonFileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UserRecordStore for JsonFileUserStore {
    async fn load(&self) -> Result<UserRecord, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let record: UserRecord = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), "Loaded user record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_record_from_file() {
        let file = write_file(r#"{"username": "admin", "password": "secret"}"#);
        let store = JsonFileUserStore::new(file.path());

        let record = store.load().await.unwrap();
        assert_eq!(record, UserRecord::new("admin", "secret"));
    }

    #[tokio::test]
    async fn rereads_file_on_every_load() {
        let file = write_file(r#"{"username": "admin", "password": "secret"}"#);
        let store = JsonFileUserStore::new(file.path());
        assert_eq!(store.load().await.unwrap().password, "secret");

        std::fs::write(file.path(), r#"{"username": "admin", "password": "rotated"}"#).unwrap();
        assert_eq!(store.load().await.unwrap().password, "rotated");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileUserStore::new(dir.path().join("user.json"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_malformed_error() {
        let file = write_file("username=admin");
        let store = JsonFileUserStore::new(file.path());

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
