use rusqlite::{params, Connection};

use crate::model::repository::FileRecord;

/// writes a file record, replacing any existing record for the same
/// (owner, folder, name). Replacement is what upload wants: the blob at the
/// derived key has already been overwritten by the time this runs
pub fn upsert_file(file: &FileRecord, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!("../assets/queries/file/upsert_file.sql"))
        .unwrap();
    match file.folder_id {
        Some(folder_id) => pst.execute(params![
            file.owner_id,
            folder_id,
            file.name,
            file.meta,
            file.created_at
        ])?,
        None => pst.execute(params![
            file.owner_id,
            rusqlite::types::Null,
            file.name,
            file.meta,
            file.created_at
        ])?,
    };
    Ok(())
}

pub fn get_file(
    owner_id: &str,
    folder_id: Option<u32>,
    name: &str,
    con: &Connection,
) -> Result<FileRecord, rusqlite::Error> {
    match folder_id {
        Some(folder_id) => {
            let mut pst = con
                .prepare(include_str!("../assets/queries/file/get_file_in_folder.sql"))
                .unwrap();
            pst.query_row(params![owner_id, folder_id, name], map_file)
        }
        None => {
            let mut pst = con
                .prepare(include_str!("../assets/queries/file/get_file_in_root.sql"))
                .unwrap();
            pst.query_row(params![owner_id, name], map_file)
        }
    }
}

/// returns the file records directly inside the passed folder, in insertion
/// order. No recursion into subfolders
pub fn get_files_for_folder(
    owner_id: &str,
    folder_id: Option<u32>,
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let mut pst = if folder_id.is_some() {
        con.prepare(include_str!(
            "../assets/queries/file/get_files_for_folder_with_id.sql"
        ))
        .unwrap()
    } else {
        con.prepare(include_str!(
            "../assets/queries/file/get_files_for_folder_root.sql"
        ))
        .unwrap()
    };
    let mapped = if folder_id.is_some() {
        pst.query_map(params![owner_id, folder_id.unwrap()], map_file)?
    } else {
        pst.query_map(params![owner_id], map_file)?
    };
    let mut files: Vec<FileRecord> = Vec::new();
    for file in mapped.into_iter() {
        files.push(file?);
    }
    Ok(files)
}

/// renames the file record in place. Returns the number of rows touched; the
/// unique index raises a constraint error if the new name is taken
pub fn rename_file(
    owner_id: &str,
    folder_id: Option<u32>,
    old_name: &str,
    new_name: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    match folder_id {
        Some(folder_id) => {
            let mut pst = con
                .prepare(include_str!(
                    "../assets/queries/file/rename_file_in_folder.sql"
                ))
                .unwrap();
            pst.execute(params![new_name, owner_id, folder_id, old_name])
        }
        None => {
            let mut pst = con
                .prepare(include_str!(
                    "../assets/queries/file/rename_file_in_root.sql"
                ))
                .unwrap();
            pst.execute(params![new_name, owner_id, old_name])
        }
    }
}

/// removes the file record. Returns the number of rows touched - 0 is not an
/// error, deletes are idempotent
pub fn delete_file(
    owner_id: &str,
    folder_id: Option<u32>,
    name: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    match folder_id {
        Some(folder_id) => {
            let mut pst = con
                .prepare(include_str!(
                    "../assets/queries/file/delete_file_in_folder.sql"
                ))
                .unwrap();
            pst.execute(params![owner_id, folder_id, name])
        }
        None => {
            let mut pst = con
                .prepare(include_str!("../assets/queries/file/delete_file_in_root.sql"))
                .unwrap();
            pst.execute(params![owner_id, name])
        }
    }
}

/// removes every file record directly inside the passed folder. Used by the
/// cascading folder delete after the folder's blob prefix has been purged
pub fn delete_files_for_folder(
    owner_id: &str,
    folder_id: u32,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!(
            "../assets/queries/file/delete_files_for_folder.sql"
        ))
        .unwrap();
    pst.execute(params![owner_id, folder_id])
}

pub fn map_file(row: &rusqlite::Row) -> Result<FileRecord, rusqlite::Error> {
    Ok(FileRecord {
        owner_id: row.get(0)?,
        folder_id: row.get(1)?,
        name: row.get(2)?,
        meta: row.get(3)?,
        created_at: row.get(4)?,
    })
}
