use chrono::NaiveDateTime;
use rocket::serde::{json::Json, Deserialize, Serialize};

use crate::model::repository::FileRecord;
use crate::model::response::BasicMessage;

type NoContent = ();

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct FileMetadataResponse {
    pub name: String,
    /// opaque encryption metadata, returned exactly as it was uploaded
    pub meta: String,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDateTime,
}

impl FileMetadataResponse {
    pub fn from(f: &FileRecord) -> FileMetadataResponse {
        FileMetadataResponse {
            name: String::from(&f.name),
            meta: String::from(&f.meta),
            created_at: f.created_at,
        }
    }
}

/// returned when the blob store can mint a time-limited read url instead of
/// the server streaming the bytes itself
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct SignedUrlResponse {
    pub url: String,
    #[serde(rename = "expiresInSeconds")]
    pub expires_in_seconds: u64,
}

#[derive(Responder)]
pub enum CreateFileResponse {
    #[response(status = 400, content_type = "json")]
    BadRequest(Json<BasicMessage>),
    #[response(status = 404, content_type = "json")]
    ParentNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 503, content_type = "json")]
    StorageError(Json<BasicMessage>),
    #[response(status = 201)]
    Success(Json<FileMetadataResponse>),
}

#[derive(Responder)]
pub enum DownloadFileResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 503, content_type = "json")]
    StorageError(Json<BasicMessage>),
    #[response(status = 200, content_type = "json")]
    SignedUrl(Json<SignedUrlResponse>),
    #[response(status = 200, content_type = "binary")]
    Bytes(Vec<u8>),
}

#[derive(Responder)]
pub enum UpdateFileResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 404, content_type = "json")]
    FolderNotFound(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    FileAlreadyExists(Json<BasicMessage>),
    #[response(status = 400, content_type = "json")]
    BadName(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 503, content_type = "json")]
    StorageError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<FileMetadataResponse>),
}

#[derive(Responder)]
pub enum DeleteFileResponse {
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 503, content_type = "json")]
    StorageError(Json<BasicMessage>),
    #[response(status = 204)]
    Deleted(NoContent),
}
