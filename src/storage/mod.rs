use std::time::Duration;

use rocket::async_trait;
use thiserror::Error;

pub mod disk;

#[derive(Debug, Error)]
pub enum BlobError {
    /// no object exists at the requested key
    #[error("no object at {0}")]
    NotFound(String),
    /// the backing store could not service the call; the caller may retry
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// capability surface over the external object store. Individual calls are
/// atomic; multi-call sequences are not, so callers order their steps to
/// stay recoverable when a sequence dies partway
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError>;

    /// removes a single object. Removing a key with nothing behind it
    /// succeeds, so deletes can be re-run
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// removes every object under the passed prefix. A prefix with no
    /// objects behind it succeeds
    async fn delete_prefix(&self, prefix: &str) -> Result<(), BlobError>;

    /// lists the keys of every object under the passed prefix
    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobError>;

    /// mints a time-limited read url for the object, or `None` when the
    /// backing store has no way to serve clients directly
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<Option<String>, BlobError>;
}

/// maps a file's coordinates to its object key. Folder identity in keys is
/// the numeric id, not the name, so folder renames never move objects
pub fn object_key(owner_id: &str, folder_id: Option<u32>, name: &str) -> String {
    match folder_id {
        Some(id) => format!("{owner_id}/{id}/{name}"),
        None => format!("{owner_id}/root/{name}"),
    }
}

/// the key prefix shared by every object directly inside the passed folder.
/// Keys carry no ancestry, so subtree operations union the prefixes of each
/// descendant folder instead of listing one big prefix
pub fn folder_prefix(owner_id: &str, folder_id: Option<u32>) -> String {
    match folder_id {
        Some(id) => format!("{owner_id}/{id}/"),
        None => format!("{owner_id}/root/"),
    }
}

/// root directory the disk blob store writes under
#[cfg(not(test))]
pub fn blob_root() -> String {
    crate::config::DRIVE_SERVER_CONFIG.clone().storage.location
}

#[cfg(test)]
pub fn blob_root() -> String {
    format!("./{}_blobs", crate::test::current_thread_name())
}

#[cfg(test)]
mod object_key_tests {
    use super::{folder_prefix, object_key};

    #[test]
    fn key_for_folder_uses_numeric_id() {
        assert_eq!("owner/42/a.enc", object_key("owner", Some(42), "a.enc"));
    }

    #[test]
    fn key_for_root_uses_root_segment() {
        assert_eq!("owner/root/a.enc", object_key("owner", None, "a.enc"));
    }

    #[test]
    fn prefix_covers_exactly_one_folder() {
        assert_eq!("owner/42/", folder_prefix("owner", Some(42)));
        assert_eq!("owner/root/", folder_prefix("owner", None));
        assert!(object_key("owner", Some(42), "a.enc").starts_with(&folder_prefix("owner", Some(42))));
        assert!(!object_key("owner", Some(421), "a.enc").starts_with(&folder_prefix("owner", Some(42))));
    }
}
