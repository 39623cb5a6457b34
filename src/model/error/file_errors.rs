/// the step of a rename's copy-then-delete sequence that failed. Every step
/// is idempotent, so a retry after any of these picks up where it left off.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RenameFileStep {
    ReadSource,
    WriteTarget,
    RemoveSource,
}

#[derive(PartialEq, Debug)]
pub enum CreateFileError {
    /// the target folder does not exist for this owner
    ParentNotFound,
    InvalidName,
    /// the database failed to save the file record
    DbFailure,
    /// the blob store rejected the object write; no metadata row was touched
    StorageFailure,
}

#[derive(PartialEq, Debug)]
pub enum GetFileError {
    NotFound,
    DbFailure,
    StorageFailure,
}

#[derive(PartialEq, Debug)]
pub enum UpdateFileError {
    /// no file with that name exists in the folder
    NotFound,
    /// the folder the file supposedly lives in does not exist
    FolderNotFound,
    /// a file with the new name already exists in the folder
    AlreadyExists,
    InvalidName,
    DbFailure,
    StorageFailure(RenameFileStep),
}

#[derive(PartialEq, Debug)]
pub enum DeleteFileError {
    DbFailure,
    StorageFailure,
}
