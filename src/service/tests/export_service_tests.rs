use std::fs;
use std::io::Read;
use std::path::Path;

use crate::model::error::folder_errors::ExportFolderError;
use crate::service::export_service::export_folder;
use crate::temp_dir;
use crate::test::*;

/// the export writes its archive into the temp dir, which rocket normally
/// creates at launch
fn ensure_temp_dir() {
    fs::create_dir_all(Path::new(temp_dir().as_str())).unwrap();
}

#[rocket::async_test]
async fn export_folder_round_trips_through_a_zip_reader() {
    refresh_db();
    remove_blobs();
    ensure_temp_dir();
    let blob = blob_store();
    let docs = create_folder_db_entry("docs", None);
    let sub = create_folder_db_entry("sub", Some(docs));
    create_file_db_entry("a", Some(docs));
    create_blob(Some(docs), "a", "AAA");
    create_file_db_entry("b", Some(sub));
    create_blob(Some(sub), "b", "BBB");
    let (archive_path, file_name) = export_folder(OWNER, docs, &blob).await.unwrap();
    assert_eq!(String::from("docs.zip"), file_name);
    let mut archive = zip::ZipArchive::new(fs::File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(2, archive.len());
    let mut contents = String::new();
    archive
        .by_name("a")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(String::from("AAA"), contents);
    let mut contents = String::new();
    archive
        .by_name("sub/b")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(String::from("BBB"), contents);
    cleanup();
}

#[rocket::async_test]
async fn export_folder_with_no_files() {
    refresh_db();
    remove_blobs();
    ensure_temp_dir();
    let blob = blob_store();
    let empty = create_folder_db_entry("empty", None);
    // a subtree of empty folders still has nothing to archive
    create_folder_db_entry("also-empty", Some(empty));
    assert_eq!(
        ExportFolderError::NoFiles,
        export_folder(OWNER, empty, &blob).await.unwrap_err()
    );
    cleanup();
}

#[rocket::async_test]
async fn export_folder_not_found() {
    refresh_db();
    remove_blobs();
    ensure_temp_dir();
    let blob = blob_store();
    assert_eq!(
        ExportFolderError::FolderNotFound,
        export_folder(OWNER, 7, &blob).await.unwrap_err()
    );
    assert_eq!(
        ExportFolderError::FolderNotFound,
        export_folder(OWNER, 0, &blob).await.unwrap_err()
    );
    cleanup();
}

#[rocket::async_test]
async fn export_folder_missing_object_is_a_storage_failure() {
    refresh_db();
    remove_blobs();
    ensure_temp_dir();
    let blob = blob_store();
    let docs = create_folder_db_entry("docs", None);
    // a record with no object behind it
    create_file_db_entry("a", Some(docs));
    assert_eq!(
        ExportFolderError::StorageFailure,
        export_folder(OWNER, docs, &blob).await.unwrap_err()
    );
    cleanup();
}
