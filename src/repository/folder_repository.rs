use rusqlite::{params, Connection, Rows};

use crate::model::repository::Folder;

pub fn get_by_id(owner_id: &str, id: Option<u32>, con: &Connection) -> Result<Folder, rusqlite::Error> {
    // if id is none, we're talking about the root folder
    if id.is_none() || id == Some(0) {
        return Ok(Folder {
            id: Some(0), // will never collide with an id since sqlite starts with 1
            name: String::from("root"),
            owner_id: String::from(owner_id),
            parent_id: None,
            created_at: chrono::offset::Local::now().naive_local(),
        });
    }
    let mut pst = con
        .prepare(include_str!(
            "../assets/queries/folder/get_folder_by_id.sql"
        ))
        .unwrap();
    pst.query_row(params![id.unwrap(), owner_id], map_folder)
}

/// returns every direct child of the passed folder, each paired with its own
/// direct-child-folder count. The count is computed by the query, files are
/// never included in it
pub fn get_child_folders(
    owner_id: &str,
    id: Option<u32>,
    con: &Connection,
) -> Result<Vec<(Folder, u32)>, rusqlite::Error> {
    let mut pst = if id.is_some() {
        con.prepare(include_str!(
            "../assets/queries/folder/get_child_folders_with_id.sql"
        ))
        .unwrap()
    } else {
        con.prepare(include_str!(
            "../assets/queries/folder/get_child_folders_root.sql"
        ))
        .unwrap()
    };
    let mut rows: Rows = if id.is_some() {
        pst.query(params![owner_id, id.unwrap()])?
    } else {
        pst.query(params![owner_id])?
    };
    let mut folders = Vec::<(Folder, u32)>::new();
    while let Some(row) = rows.next()? {
        let folder = map_folder(row)?;
        let item_count: u32 = row.get(5)?;
        folders.push((folder, item_count));
    }
    Ok(folders)
}

/// returns every folder the owner has, in insertion order and with no parent
/// filter, each paired with its direct-child-folder count
pub fn get_all_folders(
    owner_id: &str,
    con: &Connection,
) -> Result<Vec<(Folder, u32)>, rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!("../assets/queries/folder/get_all_folders.sql"))
        .unwrap();
    let mut rows: Rows = pst.query(params![owner_id])?;
    let mut folders = Vec::<(Folder, u32)>::new();
    while let Some(row) = rows.next()? {
        let folder = map_folder(row)?;
        let item_count: u32 = row.get(5)?;
        folders.push((folder, item_count));
    }
    Ok(folders)
}

/// creates a folder record in the database.
/// This does not do any checks on the parent id or sibling names; the unique
/// index is the final guard and callers must handle its constraint error
pub fn create_folder(folder: &Folder, con: &Connection) -> Result<Folder, rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!("../assets/queries/folder/create_folder.sql"))
        .unwrap();
    let id = match folder.parent_id {
        Some(parent_id) => pst.insert(params![
            folder.name,
            folder.owner_id,
            parent_id,
            folder.created_at
        ])? as u32,
        None => pst.insert(params![
            folder.name,
            folder.owner_id,
            rusqlite::types::Null,
            folder.created_at
        ])? as u32,
    };
    Ok(Folder {
        id: Some(id),
        name: String::from(&folder.name),
        owner_id: String::from(&folder.owner_id),
        parent_id: folder.parent_id,
        created_at: folder.created_at,
    })
}

/// renames a folder in place. Returns the number of rows touched; 0 means no
/// folder with that id belongs to the owner
pub fn rename_folder(
    owner_id: &str,
    id: u32,
    name: &str,
    con: &Connection,
) -> Result<usize, rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!("../assets/queries/folder/rename_folder.sql"))
        .unwrap();
    pst.execute(params![name, id, owner_id])
}

/// deletes a single folder row.
/// This _does not_ touch descendant folders or file records - deletion
/// ordering across the subtree is the service's responsibility
pub fn delete_folder(owner_id: &str, id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!(
            "../assets/queries/folder/delete_folder_by_id.sql"
        ))
        .unwrap();
    pst.execute(params![id, owner_id])?;
    Ok(())
}

/// returns the ids of every folder below the passed one, parents always
/// before their children
pub fn get_all_child_folder_ids(
    owner_id: &str,
    id: u32,
    con: &Connection,
) -> Result<Vec<u32>, rusqlite::Error> {
    let mut pst = con
        .prepare(include_str!(
            "../assets/queries/folder/get_child_folder_ids_recursive.sql"
        ))
        .unwrap();
    let mut ids = Vec::<u32>::new();
    let res = pst.query_map(params![owner_id, id], |row| row.get(0))?;
    for i in res.into_iter() {
        ids.push(i?);
    }
    Ok(ids)
}

fn map_folder(row: &rusqlite::Row) -> Result<Folder, rusqlite::Error> {
    Ok(Folder {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_id: row.get(2)?,
        parent_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}
