use std::path::Path;

use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::tokio::fs;
use rocket::State;

use crate::guard::Owner;
use crate::model::error::file_errors::{
    CreateFileError, DeleteFileError, GetFileError, UpdateFileError,
};
use crate::model::request::file_requests::{FileUpload, UpdateFileRequest};
use crate::model::response::file_responses::{
    CreateFileResponse, DeleteFileResponse, DownloadFileResponse, SignedUrlResponse,
    UpdateFileResponse,
};
use crate::model::response::BasicMessage;
use crate::service::file_service;
use crate::service::file_service::{FileContent, SIGNED_URL_TTL};
use crate::storage::BlobStore;
use crate::temp_dir;

/// accepts a file via multipart body and stores it off
#[post("/", data = "<file_input>")]
pub async fn upload_file(
    mut file_input: Form<FileUpload<'_>>,
    owner: Owner,
    blob: &State<Box<dyn BlobStore>>,
) -> CreateFileResponse {
    let folder_id = match file_input.folder_id() {
        Ok(id) => id,
        Err(_) => {
            return CreateFileResponse::BadRequest(BasicMessage::new("folderId must be a number."))
        }
    };
    // checked again by the service, but the name also becomes part of the
    // temp path below so it can't be allowed through with separators in it
    if !crate::model::request::is_valid_name(&file_input.name) {
        return CreateFileResponse::BadRequest(BasicMessage::new(
            "File names can't be empty or contain path separators.",
        ));
    }
    // park the upload in the temp dir so its bytes can be read back and
    // shipped to the blob store
    let temp_path = format!(
        "{}/{}_{}",
        temp_dir(),
        owner.id.replace(['/', '\\'], "_"),
        file_input.name
    );
    if let Err(e) = file_input.file.persist_to(Path::new(&temp_path)).await {
        log::error!("Failed to persist uploaded file to the temp directory! Error is {e:?}");
        return CreateFileResponse::FileDbError(BasicMessage::new(
            "Failed to buffer the uploaded file. Check server logs for details",
        ));
    }
    let contents = match fs::read(Path::new(&temp_path)).await {
        Ok(contents) => contents,
        Err(e) => {
            log::error!("Failed to read back uploaded file! Error is {e:?}");
            return CreateFileResponse::FileDbError(BasicMessage::new(
                "Failed to buffer the uploaded file. Check server logs for details",
            ));
        }
    };
    let result = file_service::upload_file(
        &owner.id,
        folder_id,
        &file_input.name,
        &file_input.meta,
        contents.as_slice(),
        blob.inner().as_ref(),
    )
    .await;
    fs::remove_file(Path::new(&temp_path)).await.unwrap_or(());
    match result {
        Ok(saved) => CreateFileResponse::Success(Json::from(saved)),
        Err(CreateFileError::InvalidName) => CreateFileResponse::BadRequest(BasicMessage::new(
            "File names can't be empty or contain path separators.",
        )),
        Err(CreateFileError::ParentNotFound) => CreateFileResponse::ParentNotFound(
            BasicMessage::new("No folder with the passed folderId was found."),
        ),
        Err(CreateFileError::StorageFailure) => CreateFileResponse::StorageError(
            BasicMessage::new("The blob store rejected the file. Retry the upload."),
        ),
        Err(_) => CreateFileResponse::FileDbError(BasicMessage::new(
            "Failed to save file record in database. Check server logs for details",
        )),
    }
}

/// folder_id 0 means the root folder
#[get("/<folder_id>/<name>")]
pub async fn download_file(
    folder_id: u32,
    name: &str,
    owner: Owner,
    blob: &State<Box<dyn BlobStore>>,
) -> DownloadFileResponse {
    let folder_id = if folder_id == 0 { None } else { Some(folder_id) };
    match file_service::download_file(&owner.id, folder_id, name, blob.inner().as_ref()).await {
        Ok(FileContent::SignedUrl(url)) => DownloadFileResponse::SignedUrl(Json::from(
            SignedUrlResponse {
                url,
                expires_in_seconds: SIGNED_URL_TTL.as_secs(),
            },
        )),
        Ok(FileContent::Bytes(bytes)) => DownloadFileResponse::Bytes(bytes),
        Err(GetFileError::NotFound) => DownloadFileResponse::FileNotFound(BasicMessage::new(
            "The file with the passed name could not be found.",
        )),
        Err(GetFileError::StorageFailure) => DownloadFileResponse::StorageError(
            BasicMessage::new("The blob store failed serving the file. Retry the download."),
        ),
        Err(_) => DownloadFileResponse::FileDbError(BasicMessage::new(
            "Failed to pull file info from database. Check server logs for details",
        )),
    }
}

#[put("/", data = "<file>")]
pub async fn update_file(
    file: Json<UpdateFileRequest>,
    owner: Owner,
    blob: &State<Box<dyn BlobStore>>,
) -> UpdateFileResponse {
    match file_service::update_file(&owner.id, &file.into_inner(), blob.inner().as_ref()).await {
        Ok(updated) => UpdateFileResponse::Success(Json::from(updated)),
        Err(UpdateFileError::NotFound) => UpdateFileResponse::FileNotFound(BasicMessage::new(
            "The file with the passed name could not be found.",
        )),
        Err(UpdateFileError::FolderNotFound) => UpdateFileResponse::FolderNotFound(
            BasicMessage::new("The folder with the passed id could not be found."),
        ),
        Err(UpdateFileError::AlreadyExists) => UpdateFileResponse::FileAlreadyExists(
            BasicMessage::new("A file with the same name already exists in the specified folder"),
        ),
        Err(UpdateFileError::InvalidName) => UpdateFileResponse::BadName(BasicMessage::new(
            "File names can't be empty or contain path separators.",
        )),
        Err(UpdateFileError::StorageFailure(step)) => {
            UpdateFileResponse::StorageError(BasicMessage::new(&format!(
                "The blob store failed during the rename ({step:?}). Retry the rename."
            )))
        }
        Err(_) => UpdateFileResponse::FileDbError(BasicMessage::new(
            "Failed to update file record in database. Check server logs for details",
        )),
    }
}

/// folder_id 0 means the root folder. Deleting a file that's already gone
/// returns 204 all the same
#[delete("/<folder_id>/<name>")]
pub async fn delete_file(
    folder_id: u32,
    name: &str,
    owner: Owner,
    blob: &State<Box<dyn BlobStore>>,
) -> DeleteFileResponse {
    let folder_id = if folder_id == 0 { None } else { Some(folder_id) };
    match file_service::delete_file(&owner.id, folder_id, name, blob.inner().as_ref()).await {
        Ok(()) => DeleteFileResponse::Deleted(()),
        Err(DeleteFileError::StorageFailure) => DeleteFileResponse::StorageError(
            BasicMessage::new("The blob store failed removing the file. Retry the delete."),
        ),
        Err(_) => DeleteFileResponse::FileDbError(BasicMessage::new(
            "Failed to delete file record in database. Check server logs for details",
        )),
    }
}
