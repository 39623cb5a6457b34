use rocket::fs::NamedFile;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::State;

use crate::guard::Owner;
use crate::model::error::folder_errors::{
    CreateFolderError, DeleteFolderError, ExportFolderError, GetFolderError, UpdateFolderError,
};
use crate::model::request::folder_requests::{CreateFolderRequest, UpdateFolderRequest};
use crate::model::response::folder_responses::{
    CreateFolderResponse, DeleteFolderResponse, ExportFolderResponse, GetAllFoldersResponse,
    GetFolderResponse, UpdateFolderResponse,
};
use crate::model::response::BasicMessage;
use crate::service::{export_service, folder_service};
use crate::storage::BlobStore;

#[get("/<id>")]
pub fn get_folder(id: u32, owner: Owner) -> GetFolderResponse {
    match folder_service::get_folder(&owner.id, Some(id)) {
        Ok(folder) => GetFolderResponse::Success(Json::from(folder)),
        Err(GetFolderError::NotFound) => GetFolderResponse::FolderNotFound(BasicMessage::new(
            "The folder with the passed id could not be found.",
        )),
        Err(_) => GetFolderResponse::FolderDbError(BasicMessage::new(
            "Failed to pull folder info from database. Check server logs for details",
        )),
    }
}

#[get("/all")]
pub fn get_all_folders(owner: Owner) -> GetAllFoldersResponse {
    match folder_service::get_all_folders(&owner.id) {
        Ok(folders) => GetAllFoldersResponse::Success(Json::from(folders)),
        Err(_) => GetAllFoldersResponse::FolderDbError(BasicMessage::new(
            "Failed to pull folder info from database. Check server logs for details",
        )),
    }
}

#[post("/", data = "<folder>")]
pub fn create_folder(folder: Json<CreateFolderRequest>, owner: Owner) -> CreateFolderResponse {
    match folder_service::create_folder(&owner.id, &folder.into_inner()) {
        Ok(created) => CreateFolderResponse::Success(Json::from(created)),
        Err(CreateFolderError::AlreadyExists) => CreateFolderResponse::FolderAlreadyExists(
            BasicMessage::new("That folder already exists."),
        ),
        Err(CreateFolderError::InvalidName) => CreateFolderResponse::BadName(BasicMessage::new(
            "Folder names can't be empty or contain path separators.",
        )),
        Err(CreateFolderError::ParentNotFound) => CreateFolderResponse::ParentNotFound(
            BasicMessage::new("No folder with the passed parentId was found."),
        ),
        Err(_) => CreateFolderResponse::FolderDbError(BasicMessage::new(
            "Failed to create folder in database. Check server logs for details",
        )),
    }
}

#[put("/", data = "<folder>")]
pub fn update_folder(folder: Json<UpdateFolderRequest>, owner: Owner) -> UpdateFolderResponse {
    match folder_service::update_folder(&owner.id, &folder.into_inner()) {
        Ok(updated) => UpdateFolderResponse::Success(Json::from(updated)),
        Err(UpdateFolderError::NotFound) => UpdateFolderResponse::FolderNotFound(
            BasicMessage::new("The folder with the passed id could not be found."),
        ),
        Err(UpdateFolderError::AlreadyExists) => UpdateFolderResponse::FolderAlreadyExists(
            BasicMessage::new("Cannot rename folder, because a sibling with that name already exists."),
        ),
        Err(UpdateFolderError::InvalidName) => UpdateFolderResponse::BadName(BasicMessage::new(
            "Folder names can't be empty or contain path separators.",
        )),
        Err(_) => UpdateFolderResponse::FolderDbError(BasicMessage::new(
            "Failed to update folder in database. Check server logs for details",
        )),
    }
}

#[delete("/<id>")]
pub async fn delete_folder(
    id: u32,
    owner: Owner,
    blob: &State<Box<dyn BlobStore>>,
) -> DeleteFolderResponse {
    match folder_service::delete_folder(&owner.id, id, blob.inner().as_ref()).await {
        Ok(()) => DeleteFolderResponse::Success(()),
        Err(DeleteFolderError::FolderNotFound) => DeleteFolderResponse::FolderNotFound(
            BasicMessage::new("The folder with the passed id could not be found."),
        ),
        Err(DeleteFolderError::StorageFailure) => DeleteFolderResponse::StorageError(
            BasicMessage::new("The blob store failed while purging the folder. Retry the delete."),
        ),
        Err(_) => DeleteFolderResponse::FolderDbError(BasicMessage::new(
            "Failed to delete folder in database. Check server logs for details",
        )),
    }
}

#[get("/<id>/zip")]
pub async fn export_folder(
    id: u32,
    owner: Owner,
    blob: &State<Box<dyn BlobStore>>,
) -> ExportFolderResponse {
    let (archive_path, file_name) =
        match export_service::export_folder(&owner.id, id, blob.inner().as_ref()).await {
            Ok(result) => result,
            Err(ExportFolderError::FolderNotFound) => {
                return ExportFolderResponse::FolderNotFound(BasicMessage::new(
                    "The folder with the passed id could not be found.",
                ))
            }
            Err(ExportFolderError::NoFiles) => {
                return ExportFolderResponse::NoFiles(BasicMessage::new(
                    "The folder contains no files to export.",
                ))
            }
            Err(ExportFolderError::StorageFailure) => {
                return ExportFolderResponse::StorageError(BasicMessage::new(
                    "The blob store failed while reading file contents. Retry the export.",
                ))
            }
            Err(ExportFolderError::ArchiveFailure) => {
                return ExportFolderResponse::ArchiveError(BasicMessage::new(
                    "Failed to write the archive. Check server logs for details",
                ))
            }
            Err(_) => {
                return ExportFolderResponse::FolderDbError(BasicMessage::new(
                    "Failed to pull folder info from database. Check server logs for details",
                ))
            }
        };
    match NamedFile::open(&archive_path).await {
        Ok(file) => ExportFolderResponse::Success(
            file,
            Header::new(
                "Content-Disposition",
                format!("attachment; filename=\"{file_name}\""),
            ),
        ),
        Err(e) => {
            log::error!("Failed to open finished archive {archive_path:?}! Error is {e:?}");
            ExportFolderResponse::ArchiveError(BasicMessage::new(
                "Failed to read back the archive. Check server logs for details",
            ))
        }
    }
}
