use chrono::NaiveDateTime;
use rocket::fs::NamedFile;
use rocket::http::Header;
use rocket::serde::{json::Json, Deserialize, Serialize};

use crate::model::repository::Folder;
use crate::model::response::file_responses::FileMetadataResponse;
use crate::model::response::BasicMessage;

type NoContent = ();

/// one entry of a folder's breadcrumb path, root ancestor first
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct PathSegment {
    pub id: u32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct FolderApi {
    pub id: u32,
    #[serde(rename = "parentId")]
    pub parent_id: Option<u32>,
    pub name: String,
    /// number of direct child folders. Computed at read time, never stored,
    /// and files are not counted
    #[serde(rename = "itemCount")]
    pub item_count: u32,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
}

impl FolderApi {
    pub fn from(base: &Folder, item_count: u32) -> FolderApi {
        FolderApi {
            // should always have an id when coming from the database
            id: base.id.unwrap(),
            parent_id: base.parent_id,
            name: String::from(&base.name),
            item_count,
            created_at: base.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct FolderResponse {
    pub id: u32,
    #[serde(rename = "parentId")]
    pub parent_id: Option<u32>,
    pub name: String,
    /// breadcrumb from the root ancestor down to this folder. Empty for the
    /// synthetic root folder
    pub path: Vec<PathSegment>,
    pub folders: Vec<FolderApi>,
    pub files: Vec<FileMetadataResponse>,
}

#[derive(Responder)]
pub enum GetFolderResponse {
    #[response(status = 404, content_type = "json")]
    FolderNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FolderDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<FolderResponse>),
}

#[derive(Responder)]
pub enum GetAllFoldersResponse {
    #[response(status = 500, content_type = "json")]
    FolderDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<FolderApi>>),
}

#[derive(Responder)]
pub enum CreateFolderResponse {
    #[response(status = 400, content_type = "json")]
    FolderAlreadyExists(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    BadName(Json<BasicMessage>),
    #[response(status = 404, content_type = "json")]
    ParentNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FolderDbError(Json<BasicMessage>),
    #[response(status = 201)]
    Success(Json<FolderApi>),
}

#[derive(Responder)]
pub enum UpdateFolderResponse {
    #[response(status = 404, content_type = "json")]
    FolderNotFound(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    FolderAlreadyExists(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    BadName(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FolderDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<FolderApi>),
}

#[derive(Responder)]
pub enum DeleteFolderResponse {
    #[response(status = 404, content_type = "json")]
    FolderNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FolderDbError(Json<BasicMessage>),
    #[response(status = 503, content_type = "json")]
    StorageError(Json<BasicMessage>),
    #[response(status = 204)]
    Success(NoContent),
}

#[derive(Responder)]
pub enum ExportFolderResponse {
    #[response(status = 404, content_type = "json")]
    FolderNotFound(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    NoFiles(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FolderDbError(Json<BasicMessage>),
    #[response(status = 503, content_type = "json")]
    StorageError(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    ArchiveError(Json<BasicMessage>),
    #[response(status = 200, content_type = "application/zip")]
    Success(NamedFile, Header<'static>),
}
