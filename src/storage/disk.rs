use std::path::PathBuf;
use std::time::Duration;

use rocket::async_trait;
use rocket::tokio::fs;

use crate::storage::{BlobError, BlobStore};

/// directory-backed blob store. Keys map to paths below the configured root;
/// it cannot mint signed urls, so downloads fall back to streaming bytes
/// through the server
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    pub fn new(root: &str) -> DiskBlobStore {
        DiskBlobStore {
            root: PathBuf::from(root),
        }
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError> {
        let path = self.full_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Unavailable(e.to_string()))?;
        }
        fs::write(&path, data)
            .await
            .map_err(|e| BlobError::Unavailable(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError> {
        match fs::read(self.full_path(key)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(String::from(key)))
            }
            Err(e) => Err(BlobError::Unavailable(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        match fs::remove_file(self.full_path(key)).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Unavailable(e.to_string())),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), BlobError> {
        // a folder prefix always ends in '/', which maps onto a directory
        match fs::remove_dir_all(self.full_path(prefix.trim_end_matches('/'))).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Unavailable(e.to_string())),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError> {
        let dir = self.full_path(prefix.trim_end_matches('/'));
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BlobError::Unavailable(e.to_string())),
        };
        let mut keys = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    keys.push(format!("{}{}", prefix, name));
                }
                Ok(None) => break,
                Err(e) => return Err(BlobError::Unavailable(e.to_string())),
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn signed_url(&self, _key: &str, _ttl: Duration) -> Result<Option<String>, BlobError> {
        // the disk store has no url-serving frontend
        Ok(None)
    }
}
