#[derive(PartialEq, Debug)]
pub enum GetFolderError {
    NotFound,
    DbFailure,
}

#[derive(PartialEq, Debug)]
pub enum CreateFolderError {
    /// a sibling folder with the same name already exists
    AlreadyExists,
    /// the name is empty or contains characters that can't appear in a name
    InvalidName,
    /// the requested parent folder does not exist for this owner
    ParentNotFound,
    /// the database failed to save the folder
    DbFailure,
}

#[derive(PartialEq, Debug)]
pub enum UpdateFolderError {
    /// the folder could not be found
    NotFound,
    /// a sibling folder with the new name already exists
    AlreadyExists,
    InvalidName,
    /// the database failed to update the folder
    DbFailure,
}

#[derive(PartialEq, Debug)]
pub enum DeleteFolderError {
    /// folder not in the repository
    FolderNotFound,
    /// database could not execute one of the deletes
    DbFailure,
    /// the blob store failed while purging a folder prefix. Rows for the
    /// unpurged part of the subtree are left in place so the delete can be
    /// re-run
    StorageFailure,
}

#[derive(PartialEq, Debug)]
pub enum ExportFolderError {
    FolderNotFound,
    /// the subtree holds no files, so there is nothing to archive
    NoFiles,
    DbFailure,
    /// the blob store failed while reading an object's bytes
    StorageFailure,
    /// the archive could not be written to the local temp directory
    ArchiveFailure,
}
