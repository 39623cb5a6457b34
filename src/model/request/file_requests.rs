use std::num::ParseIntError;

use rocket::fs::TempFile;
use rocket::serde::{Deserialize, Serialize};

#[derive(FromForm)]
pub struct FileUpload<'a> {
    /// the (already encrypted) file being uploaded
    pub file: TempFile<'a>,
    /// the name to store the file under. This is carried as its own field
    /// because multipart filename sanitization would mangle encrypted names
    pub name: String,
    /// opaque encryption metadata, stored verbatim alongside the record
    pub meta: String,
    /// leave blank or 0 for the top level folder.
    ///
    /// Rocket has trouble parsing numeric multipart fields from some clients,
    /// so this stays a string and is parsed by [`FileUpload::folder_id`]
    #[field(name = "folderId")]
    folder_id: Option<String>,
}

impl FileUpload<'_> {
    /// parses the folderId form field; 0 and absent both mean the root folder
    pub fn folder_id(&self) -> Result<Option<u32>, ParseIntError> {
        match &self.folder_id {
            Some(id) => id
                .parse::<u32>()
                .map(|id| if id == 0 { None } else { Some(id) }),
            None => Ok(None),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UpdateFileRequest {
    #[serde(rename = "folderId")]
    pub folder_id: Option<u32>,
    pub name: String,
    #[serde(rename = "newName")]
    pub new_name: String,
}
