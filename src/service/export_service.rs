use std::backtrace::Backtrace;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use rusqlite::Connection;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::model::error::folder_errors::ExportFolderError;
use crate::repository::{file_repository, folder_repository, open_connection};
use crate::storage::{object_key, BlobStore};
use crate::temp_dir;

/// one file to be placed in the archive: the object key its bytes live
/// under, and the path it gets inside the zip (relative to the exported
/// folder)
struct ArchiveEntry {
    key: String,
    relative_path: String,
}

/// streams every file under the folder's subtree into a zip archive on the
/// temp directory, one entry at a time. Returns the archive's path and the
/// suggested download name `<folder-name>.zip`
pub async fn export_folder(
    owner_id: &str,
    id: u32,
    blob: &dyn BlobStore,
) -> Result<(PathBuf, String), ExportFolderError> {
    if id == 0 {
        return Err(ExportFolderError::FolderNotFound);
    }
    // resolve the subtree up front; the connection must not stay open across
    // the blob reads
    let (folder_name, entries) = {
        let con = open_connection();
        let resolved = collect_archive_entries(owner_id, id, &con);
        con.close().unwrap();
        resolved?
    };
    if entries.is_empty() {
        return Err(ExportFolderError::NoFiles);
    }
    let archive_path = PathBuf::from(format!("{}/{owner_id}_{id}.zip", temp_dir()));
    let mut archive = match File::create(&archive_path) {
        Ok(file) => ZipWriter::new(file),
        Err(e) => {
            log::error!(
                "Failed to create archive file! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(ExportFolderError::ArchiveFailure);
        }
    };
    // the payload is already ciphertext, which does not compress
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for entry in entries {
        let bytes = match blob.get(&entry.key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!(
                    "Failed to read object at {} for export! Error is {e:?}\n{}",
                    entry.key,
                    Backtrace::force_capture()
                );
                return Err(ExportFolderError::StorageFailure);
            }
        };
        let written = archive
            .start_file(entry.relative_path.as_str(), options)
            .map_err(|e| e.to_string())
            .and_then(|_| archive.write_all(&bytes).map_err(|e| e.to_string()));
        if let Err(e) = written {
            log::error!(
                "Failed to write archive entry {}! Error is {e}\n{}",
                entry.relative_path,
                Backtrace::force_capture()
            );
            return Err(ExportFolderError::ArchiveFailure);
        }
    }
    if let Err(e) = archive.finish() {
        log::error!(
            "Failed to finish archive! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(ExportFolderError::ArchiveFailure);
    }
    Ok((archive_path, format!("{folder_name}.zip")))
}

/// walks the folder's subtree depth-first, pairing every file's object key
/// with its archive path. Object keys carry no ancestry, so the walk goes
/// through the folder rows rather than a single prefix listing
fn collect_archive_entries(
    owner_id: &str,
    id: u32,
    con: &Connection,
) -> Result<(String, Vec<ArchiveEntry>), ExportFolderError> {
    let folder = match folder_repository::get_by_id(owner_id, Some(id), con) {
        Ok(folder) => folder,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(ExportFolderError::FolderNotFound)
        }
        Err(e) => {
            log::error!(
                "Failed to look up folder for export! Error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(ExportFolderError::DbFailure);
        }
    };
    let mut entries = Vec::<ArchiveEntry>::new();
    collect_entries_recursively(owner_id, id, "", con, &mut entries).map_err(|e| {
        log::error!(
            "Failed to walk subtree for export! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        ExportFolderError::DbFailure
    })?;
    Ok((folder.name, entries))
}

fn collect_entries_recursively(
    owner_id: &str,
    folder_id: u32,
    prefix: &str,
    con: &Connection,
    entries: &mut Vec<ArchiveEntry>,
) -> Result<(), rusqlite::Error> {
    for file in file_repository::get_files_for_folder(owner_id, Some(folder_id), con)? {
        entries.push(ArchiveEntry {
            key: object_key(owner_id, Some(folder_id), &file.name),
            relative_path: format!("{prefix}{}", file.name),
        });
    }
    for (child, _) in folder_repository::get_child_folders(owner_id, Some(folder_id), con)? {
        collect_entries_recursively(
            owner_id,
            child.id.unwrap(),
            &format!("{prefix}{}/", child.name),
            con,
            entries,
        )?;
    }
    Ok(())
}
