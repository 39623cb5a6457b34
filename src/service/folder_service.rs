use std::backtrace::Backtrace;

use rusqlite::Connection;

use crate::model::error::folder_errors::{
    CreateFolderError, DeleteFolderError, GetFolderError, UpdateFolderError,
};
use crate::model::repository::Folder;
use crate::model::request::folder_requests::{CreateFolderRequest, UpdateFolderRequest};
use crate::model::request::is_valid_name;
use crate::model::response::file_responses::FileMetadataResponse;
use crate::model::response::folder_responses::{FolderApi, FolderResponse, PathSegment};
use crate::repository::{file_repository, folder_repository, open_connection};
use crate::service::is_constraint_violation;
use crate::storage::{folder_prefix, BlobStore};

/// retrieves a folder along with its direct child folders (each annotated
/// with its own child-folder count), its files, and its breadcrumb path
pub fn get_folder(owner_id: &str, id: Option<u32>) -> Result<FolderResponse, GetFolderError> {
    // the client can pass 0 for the folder id, which means the root folder
    let db_id = if id == Some(0) { None } else { id };
    let con = open_connection();
    let result = get_folder_internal(owner_id, db_id, &con);
    con.close().unwrap();
    result
}

/// returns every folder the owner has as a flat list
pub fn get_all_folders(owner_id: &str) -> Result<Vec<FolderApi>, GetFolderError> {
    let con = open_connection();
    let folders = folder_repository::get_all_folders(owner_id, &con);
    con.close().unwrap();
    match folders {
        Ok(folders) => Ok(folders
            .iter()
            .map(|(folder, item_count)| FolderApi::from(folder, *item_count))
            .collect::<Vec<FolderApi>>()),
        Err(e) => {
            log::error!(
                "Failed to pull all folders from the database! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(GetFolderError::DbFailure)
        }
    }
}

pub fn create_folder(
    owner_id: &str,
    request: &CreateFolderRequest,
) -> Result<FolderApi, CreateFolderError> {
    if !is_valid_name(&request.name) {
        return Err(CreateFolderError::InvalidName);
    }
    // the client can pass 0 for the parent id, which means the root folder
    let parent_id = if request.parent_id == Some(0) {
        None
    } else {
        request.parent_id
    };
    let con = open_connection();
    let created = create_folder_internal(owner_id, parent_id, &request.name, &con);
    con.close().unwrap();
    created
}

/// renames a folder in place. Folders are never re-parented, so blob object
/// keys (which only carry the folder's numeric id) are unaffected
pub fn update_folder(
    owner_id: &str,
    request: &UpdateFolderRequest,
) -> Result<FolderApi, UpdateFolderError> {
    if request.id == 0 {
        return Err(UpdateFolderError::NotFound);
    }
    if !is_valid_name(&request.name) {
        return Err(UpdateFolderError::InvalidName);
    }
    let con = open_connection();
    let updated = update_folder_internal(owner_id, request.id, &request.name, &con);
    con.close().unwrap();
    updated
}

/// recursively deletes the folder, every descendant folder, every file record
/// beneath them, and every blob object under each of their key prefixes.
/// Work runs deepest-first so a child's blob purge always precedes its
/// parent's, and a failure partway leaves only not-yet-processed rows behind,
/// ready for a re-run
pub async fn delete_folder(
    owner_id: &str,
    id: u32,
    blob: &dyn BlobStore,
) -> Result<(), DeleteFolderError> {
    if id == 0 {
        return Err(DeleteFolderError::FolderNotFound);
    }
    // collect the deletion order up front; the connection must not stay open
    // across the blob calls
    let targets = {
        let con = open_connection();
        let targets = collect_delete_targets(owner_id, id, &con);
        con.close().unwrap();
        targets?
    };
    for folder_id in targets {
        if let Err(e) = blob.delete_prefix(&folder_prefix(owner_id, Some(folder_id))).await {
            log::error!(
                "Failed to purge blob prefix for folder {folder_id}; leaving its rows for a retry. Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(DeleteFolderError::StorageFailure);
        }
        let con = open_connection();
        let removed = remove_folder_rows(owner_id, folder_id, &con);
        con.close().unwrap();
        removed?;
    }
    Ok(())
}

// private functions

fn get_folder_internal(
    owner_id: &str,
    id: Option<u32>,
    con: &Connection,
) -> Result<FolderResponse, GetFolderError> {
    let folder = match folder_repository::get_by_id(owner_id, id, con) {
        Ok(folder) => folder,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(GetFolderError::NotFound),
        Err(e) => {
            log::error!(
                "Failed to pull folder info from the database! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(GetFolderError::DbFailure);
        }
    };
    let children = folder_repository::get_child_folders(owner_id, id, con).map_err(|e| {
        log::error!(
            "Failed to pull child folder info from the database! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        GetFolderError::DbFailure
    })?;
    let files = file_repository::get_files_for_folder(owner_id, id, con).map_err(|e| {
        log::error!(
            "Failed to pull child file info from the database! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        GetFolderError::DbFailure
    })?;
    let path = breadcrumb_internal(owner_id, id, con)?;
    Ok(FolderResponse {
        // should always have an id when coming from the database
        id: folder.id.unwrap(),
        parent_id: folder.parent_id,
        name: folder.name,
        path,
        folders: children
            .iter()
            .map(|(folder, item_count)| FolderApi::from(folder, *item_count))
            .collect(),
        files: files.iter().map(FileMetadataResponse::from).collect(),
    })
}

fn breadcrumb_internal(
    owner_id: &str,
    id: Option<u32>,
    con: &Connection,
) -> Result<Vec<PathSegment>, GetFolderError> {
    let mut segments = Vec::<PathSegment>::new();
    // the forest invariant (parents must exist at creation, no re-parenting)
    // guarantees this walk terminates
    let mut current = if id == Some(0) { None } else { id };
    while let Some(folder_id) = current {
        let folder = match folder_repository::get_by_id(owner_id, Some(folder_id), con) {
            Ok(folder) => folder,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                // a dangling ancestor reference; the tree is damaged
                log::error!(
                    "Folder {folder_id} is referenced as an ancestor but does not exist!\n{}",
                    Backtrace::force_capture()
                );
                return Err(GetFolderError::NotFound);
            }
            Err(e) => {
                log::error!(
                    "Failed to walk folder ancestry! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(GetFolderError::DbFailure);
            }
        };
        current = folder.parent_id;
        segments.push(PathSegment {
            id: folder_id,
            name: folder.name,
        });
    }
    segments.reverse();
    Ok(segments)
}

fn create_folder_internal(
    owner_id: &str,
    parent_id: Option<u32>,
    name: &str,
    con: &Connection,
) -> Result<FolderApi, CreateFolderError> {
    // if the folder has a parent id, it has to exist for this owner
    if parent_id.is_some() {
        match folder_repository::get_by_id(owner_id, parent_id, con) {
            Ok(_) => { /* no op */ }
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(CreateFolderError::ParentNotFound)
            }
            Err(e) => {
                log::error!(
                    "Failed to check parent folder! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(CreateFolderError::DbFailure);
            }
        };
    }
    // sibling pre-check for a friendlier error; the unique index is the
    // authority either way
    match does_folder_exist(owner_id, parent_id, name, con) {
        Ok(true) => return Err(CreateFolderError::AlreadyExists),
        Ok(false) => { /* no op */ }
        Err(_) => return Err(CreateFolderError::DbFailure),
    };
    let folder = Folder {
        id: None,
        name: String::from(name),
        owner_id: String::from(owner_id),
        parent_id,
        created_at: chrono::offset::Local::now().naive_local(),
    };
    match folder_repository::create_folder(&folder, con) {
        Ok(created) => Ok(FolderApi::from(&created, 0)),
        Err(e) if is_constraint_violation(&e) => Err(CreateFolderError::AlreadyExists),
        Err(e) => {
            log::error!(
                "Error trying to save folder! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(CreateFolderError::DbFailure)
        }
    }
}

fn update_folder_internal(
    owner_id: &str,
    id: u32,
    name: &str,
    con: &Connection,
) -> Result<FolderApi, UpdateFolderError> {
    let folder = match folder_repository::get_by_id(owner_id, Some(id), con) {
        Ok(folder) => folder,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(UpdateFolderError::NotFound),
        Err(e) => {
            log::error!(
                "Failed to pull folder info from the database! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(UpdateFolderError::DbFailure);
        }
    };
    if folder.name != name {
        match does_folder_exist(owner_id, folder.parent_id, name, con) {
            Ok(true) => return Err(UpdateFolderError::AlreadyExists),
            Ok(false) => { /* no op */ }
            Err(_) => return Err(UpdateFolderError::DbFailure),
        };
    }
    match folder_repository::rename_folder(owner_id, id, name, con) {
        Ok(0) => return Err(UpdateFolderError::NotFound),
        Ok(_) => { /* no op */ }
        Err(e) if is_constraint_violation(&e) => return Err(UpdateFolderError::AlreadyExists),
        Err(e) => {
            log::error!(
                "Failed to rename folder in the database! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(UpdateFolderError::DbFailure);
        }
    };
    let item_count = match folder_repository::get_child_folders(owner_id, Some(id), con) {
        Ok(children) => children.len() as u32,
        Err(_) => 0,
    };
    Ok(FolderApi {
        id,
        parent_id: folder.parent_id,
        name: String::from(name),
        item_count,
        created_at: folder.created_at,
    })
}

/// checks if a folder with the passed name exists within the folder with the passed id
fn does_folder_exist(
    owner_id: &str,
    parent_id: Option<u32>,
    name: &str,
    con: &Connection,
) -> Result<bool, rusqlite::Error> {
    let matching = folder_repository::get_child_folders(owner_id, parent_id, con)?
        .iter()
        .any(|(folder, _)| folder.name == name);
    Ok(matching)
}

/// resolves the order folders must be purged in: every descendant first,
/// deepest last in the recursive listing so the reversed list walks the tree
/// bottom-up, and the requested folder at the very end
fn collect_delete_targets(
    owner_id: &str,
    id: u32,
    con: &Connection,
) -> Result<Vec<u32>, DeleteFolderError> {
    if let Err(e) = folder_repository::get_by_id(owner_id, Some(id), con) {
        return if e == rusqlite::Error::QueryReturnedNoRows {
            Err(DeleteFolderError::FolderNotFound)
        } else {
            log::error!(
                "Failed to look up folder for delete! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(DeleteFolderError::DbFailure)
        };
    }
    let mut ids = match folder_repository::get_all_child_folder_ids(owner_id, id, con) {
        Ok(ids) => ids,
        Err(e) => {
            log::error!(
                "Failed to collect descendant folder ids! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(DeleteFolderError::DbFailure);
        }
    };
    // parents come before children in the recursive query
    ids.reverse();
    ids.push(id);
    Ok(ids)
}

/// removes a single folder's file records and its own row, once its blob
/// prefix has already been purged
fn remove_folder_rows(owner_id: &str, id: u32, con: &Connection) -> Result<(), DeleteFolderError> {
    if let Err(e) = file_repository::delete_files_for_folder(owner_id, id, con) {
        log::error!(
            "Failed to delete file records for folder {id}! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(DeleteFolderError::DbFailure);
    }
    if let Err(e) = folder_repository::delete_folder(owner_id, id, con) {
        log::error!(
            "Failed to delete folder {id}! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(DeleteFolderError::DbFailure);
    }
    Ok(())
}
