use std::fs;
use std::fs::{remove_dir_all, remove_file};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::model::repository::{FileRecord, Folder};
use crate::repository::{file_repository, folder_repository, initialize_db, open_connection};
use crate::storage::disk::DiskBlobStore;
use crate::storage::{blob_root, object_key};
use crate::temp_dir;


/// bearer token whose payload subject is `test-owner`
pub static AUTH: &str =
    "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ0ZXN0LW93bmVyIn0.sig";
/// bearer token whose payload subject is `other-owner`
pub static OTHER_AUTH: &str =
    "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJvdGhlci1vd25lciJ9.sig";
/// the owner id that [`AUTH`] resolves to
pub static OWNER: &str = "test-owner";

pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

pub fn refresh_db() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    initialize_db().unwrap();
}

pub fn remove_blobs() {
    remove_dir_all(Path::new(blob_root().as_str())).unwrap_or(());
}

pub fn cleanup() {
    let thread_name = current_thread_name();
    remove_blobs();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    remove_dir_all(Path::new(temp_dir().as_str())).unwrap_or(());
}

/// every test talks to a store rooted in a directory named after the test's
/// thread, the same one the test rocket uses
pub fn blob_store() -> DiskBlobStore {
    DiskBlobStore::new(blob_root().as_str())
}

pub fn now() -> NaiveDateTime {
    chrono::offset::Local::now().naive_local()
}

pub fn create_folder_db_entry(name: &str, parent_id: Option<u32>) -> u32 {
    let connection = open_connection();
    let created = folder_repository::create_folder(
        &Folder {
            id: None,
            name: String::from(name),
            owner_id: String::from(OWNER),
            parent_id,
            created_at: now(),
        },
        &connection,
    )
    .unwrap();
    connection.close().unwrap();
    created.id.unwrap()
}

pub fn create_file_db_entry(name: &str, folder_id: Option<u32>) {
    let connection = open_connection();
    file_repository::upsert_file(
        &FileRecord {
            owner_id: String::from(OWNER),
            folder_id,
            name: String::from(name),
            meta: String::from("{}"),
            created_at: now(),
        },
        &connection,
    )
    .unwrap();
    connection.close().unwrap();
}

/// drops an object straight into the on-disk blob store, bypassing the
/// adapter, for tests that stage state up front
pub fn create_blob(folder_id: Option<u32>, name: &str, contents: &str) {
    let path = format!("{}/{}", blob_root(), object_key(OWNER, folder_id, name));
    let path = Path::new(path.as_str());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// true when an object exists at the key derived from the passed coordinates
pub fn blob_exists(folder_id: Option<u32>, name: &str) -> bool {
    let path = format!("{}/{}", blob_root(), object_key(OWNER, folder_id, name));
    Path::new(path.as_str()).exists()
}
