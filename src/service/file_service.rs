use std::backtrace::Backtrace;
use std::time::Duration;

use rusqlite::Connection;

use crate::model::error::file_errors::{
    CreateFileError, DeleteFileError, GetFileError, RenameFileStep, UpdateFileError,
};
use crate::model::repository::FileRecord;
use crate::model::request::file_requests::UpdateFileRequest;
use crate::model::request::is_valid_name;
use crate::model::response::file_responses::FileMetadataResponse;
use crate::repository::{file_repository, folder_repository, open_connection};
use crate::service::is_constraint_violation;
use crate::storage::{object_key, BlobError, BlobStore};

/// how long a minted download url stays valid
pub static SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// what a download resolves to: a url the client can hit directly when the
/// blob store can mint one, or the object's bytes otherwise
#[derive(Debug)]
pub enum FileContent {
    SignedUrl(String),
    Bytes(Vec<u8>),
}

/// stores a file's bytes in the blob store and caches its metadata row.
/// Uploading a name that already exists in the folder replaces it: the put
/// overwrites the object at the same derived key, and the row is upserted
/// only after the store has acknowledged the write, so a failed put never
/// leaves a row pointing at missing bytes
pub async fn upload_file(
    owner_id: &str,
    folder_id: Option<u32>,
    name: &str,
    meta: &str,
    contents: &[u8],
    blob: &dyn BlobStore,
) -> Result<FileMetadataResponse, CreateFileError> {
    if !is_valid_name(name) {
        return Err(CreateFileError::InvalidName);
    }
    {
        let con = open_connection();
        let parent_check = check_parent_folder(owner_id, folder_id, &con);
        con.close().unwrap();
        parent_check?;
    }
    if let Err(e) = blob.put(&object_key(owner_id, folder_id, name), contents).await {
        log::error!(
            "Failed to write file object to the blob store! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(CreateFileError::StorageFailure);
    }
    let record = FileRecord {
        owner_id: String::from(owner_id),
        folder_id,
        name: String::from(name),
        meta: String::from(meta),
        created_at: chrono::offset::Local::now().naive_local(),
    };
    let con = open_connection();
    let saved = file_repository::upsert_file(&record, &con);
    con.close().unwrap();
    match saved {
        Ok(_) => Ok(FileMetadataResponse::from(&record)),
        Err(e) => {
            log::error!(
                "Failed to save file record! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(CreateFileError::DbFailure)
        }
    }
}

/// resolves a download to a signed url when the store can mint one, falling
/// back to reading the bytes through the server
pub async fn download_file(
    owner_id: &str,
    folder_id: Option<u32>,
    name: &str,
    blob: &dyn BlobStore,
) -> Result<FileContent, GetFileError> {
    {
        let con = open_connection();
        let record = file_repository::get_file(owner_id, folder_id, name, &con);
        con.close().unwrap();
        match record {
            Ok(_) => { /* no op */ }
            Err(rusqlite::Error::QueryReturnedNoRows) => return Err(GetFileError::NotFound),
            Err(e) => {
                log::error!(
                    "Failed to pull file record from the database! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(GetFileError::DbFailure);
            }
        };
    }
    let key = object_key(owner_id, folder_id, name);
    match blob.signed_url(&key, SIGNED_URL_TTL).await {
        Ok(Some(url)) => return Ok(FileContent::SignedUrl(url)),
        Ok(None) => { /* store can't mint urls, stream the bytes instead */ }
        Err(e) => {
            log::error!(
                "Failed to mint signed url for {key}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(GetFileError::StorageFailure);
        }
    };
    match blob.get(&key).await {
        Ok(bytes) => Ok(FileContent::Bytes(bytes)),
        Err(BlobError::NotFound(_)) => {
            // a metadata row with no object behind it; surface it like a
            // missing file but make sure it lands in the logs
            log::error!(
                "File record exists but no object found at {key}!\n{}",
                Backtrace::force_capture()
            );
            Err(GetFileError::NotFound)
        }
        Err(e) => {
            log::error!(
                "Failed to read object at {key}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(GetFileError::StorageFailure)
        }
    }
}

/// removes the object first and the metadata row second, so a partial failure
/// can only ever leave a row whose delete can be retried - never an orphaned
/// object. Deleting a file that's already gone succeeds
pub async fn delete_file(
    owner_id: &str,
    folder_id: Option<u32>,
    name: &str,
    blob: &dyn BlobStore,
) -> Result<(), DeleteFileError> {
    if let Err(e) = blob.delete(&object_key(owner_id, folder_id, name)).await {
        log::error!(
            "Failed to delete file object from the blob store! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(DeleteFileError::StorageFailure);
    }
    let con = open_connection();
    let removed = file_repository::delete_file(owner_id, folder_id, name, &con);
    con.close().unwrap();
    match removed {
        // 0 rows removed means it was already gone, which is fine
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!(
                "Failed to delete file record! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(DeleteFileError::DbFailure)
        }
    }
}

/// renames a file. Object keys are immutable, so this is copy-then-delete
/// against the blob store - read at the old key, write at the new key, drop
/// the old object - with the metadata row updated last. Each step is
/// idempotent, so a sequence that dies partway can simply be re-run
pub async fn update_file(
    owner_id: &str,
    request: &UpdateFileRequest,
    blob: &dyn BlobStore,
) -> Result<FileMetadataResponse, UpdateFileError> {
    if !is_valid_name(&request.new_name) {
        return Err(UpdateFileError::InvalidName);
    }
    let folder_id = if request.folder_id == Some(0) {
        None
    } else {
        request.folder_id
    };
    let record = {
        let con = open_connection();
        let checks = check_rename(owner_id, folder_id, &request.name, &request.new_name, &con);
        con.close().unwrap();
        checks?
    };
    if request.new_name == request.name {
        return Ok(FileMetadataResponse::from(&record));
    }
    let old_key = object_key(owner_id, folder_id, &request.name);
    let new_key = object_key(owner_id, folder_id, &request.new_name);
    let bytes = match blob.get(&old_key).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!(
                "Rename failed reading the source object at {old_key}! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(UpdateFileError::StorageFailure(RenameFileStep::ReadSource));
        }
    };
    if let Err(e) = blob.put(&new_key, bytes.as_slice()).await {
        log::error!(
            "Rename failed writing the target object at {new_key}! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(UpdateFileError::StorageFailure(RenameFileStep::WriteTarget));
    }
    if let Err(e) = blob.delete(&old_key).await {
        log::error!(
            "Rename failed removing the source object at {old_key}! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(UpdateFileError::StorageFailure(RenameFileStep::RemoveSource));
    }
    let renamed = {
        let con = open_connection();
        let renamed = file_repository::rename_file(
            owner_id,
            folder_id,
            &request.name,
            &request.new_name,
            &con,
        );
        con.close().unwrap();
        renamed
    };
    match renamed {
        Ok(0) => Err(UpdateFileError::NotFound),
        Ok(_) => Ok(FileMetadataResponse {
            name: String::from(&request.new_name),
            meta: record.meta,
            created_at: record.created_at,
        }),
        Err(e) if is_constraint_violation(&e) => {
            // a concurrent writer claimed the new name between the pre-check
            // and the row update; drop the copied object so only the loser's
            // original remains
            if let Err(e) = blob.delete(&new_key).await {
                log::error!(
                    "Failed to drop the copied object at {new_key} after a rename conflict! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
            }
            Err(UpdateFileError::AlreadyExists)
        }
        Err(e) => {
            log::error!(
                "Failed to rename file record! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(UpdateFileError::DbFailure)
        }
    }
}

// private functions

fn check_parent_folder(
    owner_id: &str,
    folder_id: Option<u32>,
    con: &Connection,
) -> Result<(), CreateFileError> {
    if folder_id.is_none() {
        return Ok(());
    }
    match folder_repository::get_by_id(owner_id, folder_id, con) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(CreateFileError::ParentNotFound),
        Err(e) => {
            log::error!(
                "Failed to check target folder! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(CreateFileError::DbFailure)
        }
    }
}

/// the up-front checks for a rename: the folder must exist, the source record
/// must exist, and the target name must be free. The target check runs before
/// any object is copied so a conflict never silently overwrites
fn check_rename(
    owner_id: &str,
    folder_id: Option<u32>,
    name: &str,
    new_name: &str,
    con: &Connection,
) -> Result<FileRecord, UpdateFileError> {
    if folder_id.is_some() {
        match folder_repository::get_by_id(owner_id, folder_id, con) {
            Ok(_) => { /* no op */ }
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(UpdateFileError::FolderNotFound)
            }
            Err(e) => {
                log::error!(
                    "Failed to check folder for rename! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(UpdateFileError::DbFailure);
            }
        };
    }
    let record = match file_repository::get_file(owner_id, folder_id, name, con) {
        Ok(record) => record,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(UpdateFileError::NotFound),
        Err(e) => {
            log::error!(
                "Failed to pull file record for rename! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(UpdateFileError::DbFailure);
        }
    };
    if new_name != name {
        match file_repository::get_file(owner_id, folder_id, new_name, con) {
            Ok(_) => return Err(UpdateFileError::AlreadyExists),
            Err(rusqlite::Error::QueryReturnedNoRows) => { /* the name is free */ }
            Err(e) => {
                log::error!(
                    "Failed to check target name for rename! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(UpdateFileError::DbFailure);
            }
        };
    }
    Ok(record)
}
