use chrono::NaiveDateTime;

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Folder {
    /// cannot be changed, and only retrieved from the database
    pub id: Option<u32>,
    /// the display name of the folder; blob object keys never contain it
    pub name: String,
    pub owner_id: String,
    /// may be `None` to represent it being a top-level folder
    pub parent_id: Option<u32>,
    pub created_at: NaiveDateTime,
}

/// a cached row of file metadata. The file's bytes live in the blob store
/// under the key derived from (owner_id, folder_id, name); this row exists so
/// folder listings never have to round-trip to the blob store.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FileRecord {
    pub owner_id: String,
    /// will be None if in the root folder
    pub folder_id: Option<u32>,
    /// the (client-encrypted) file name; identity within a folder
    pub name: String,
    /// opaque encryption metadata supplied by the client, never interpreted
    pub meta: String,
    pub created_at: NaiveDateTime,
}
