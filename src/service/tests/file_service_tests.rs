mod upload_file_tests {
    use crate::model::error::file_errors::CreateFileError;
    use crate::service::file_service::upload_file;
    use crate::service::folder_service::get_folder;
    use crate::storage::{object_key, BlobStore};
    use crate::test::*;

    #[rocket::async_test]
    async fn upload_file_works() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        let saved = upload_file(OWNER, None, "a.enc", "{\"iv\":\"x\"}", b"hi", &blob)
            .await
            .unwrap();
        assert_eq!(String::from("a.enc"), saved.name);
        assert_eq!(String::from("{\"iv\":\"x\"}"), saved.meta);
        let bytes = blob.get(&object_key(OWNER, None, "a.enc")).await.unwrap();
        assert_eq!(b"hi".to_vec(), bytes);
        let root = get_folder(OWNER, None).unwrap();
        assert_eq!(1, root.files.len());
        cleanup();
    }

    #[rocket::async_test]
    async fn upload_file_replaces_existing() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"one", &blob).await.unwrap();
        upload_file(OWNER, None, "a.enc", "{}", b"two", &blob).await.unwrap();
        // exactly one row and one object, holding the latest content
        let root = get_folder(OWNER, None).unwrap();
        assert_eq!(1, root.files.len());
        let keys = blob.list(&crate::storage::folder_prefix(OWNER, None)).await.unwrap();
        assert_eq!(1, keys.len());
        let bytes = blob.get(&object_key(OWNER, None, "a.enc")).await.unwrap();
        assert_eq!(b"two".to_vec(), bytes);
        cleanup();
    }

    #[rocket::async_test]
    async fn upload_file_into_folder() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        let folder = create_folder_db_entry("stuff", None);
        upload_file(OWNER, Some(folder), "a.enc", "{}", b"hi", &blob)
            .await
            .unwrap();
        assert!(blob_exists(Some(folder), "a.enc"));
        let listing = get_folder(OWNER, Some(folder)).unwrap();
        assert_eq!(1, listing.files.len());
        cleanup();
    }

    #[rocket::async_test]
    async fn upload_file_parent_not_found() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        let res = upload_file(OWNER, Some(9), "a.enc", "{}", b"hi", &blob)
            .await
            .unwrap_err();
        assert_eq!(CreateFileError::ParentNotFound, res);
        // nothing must have been written
        assert!(!blob_exists(Some(9), "a.enc"));
        cleanup();
    }

    #[rocket::async_test]
    async fn upload_file_invalid_name() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        for name in ["", "a/b", "."] {
            let res = upload_file(OWNER, None, name, "{}", b"hi", &blob)
                .await
                .unwrap_err();
            assert_eq!(CreateFileError::InvalidName, res);
        }
        cleanup();
    }
}

mod download_file_tests {
    use crate::model::error::file_errors::GetFileError;
    use crate::service::file_service::{download_file, upload_file, FileContent};
    use crate::test::*;

    #[rocket::async_test]
    async fn download_file_returns_bytes() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"hello", &blob).await.unwrap();
        // the disk store can't mint urls, so the bytes come back directly
        match download_file(OWNER, None, "a.enc", &blob).await.unwrap() {
            FileContent::Bytes(bytes) => assert_eq!(b"hello".to_vec(), bytes),
            FileContent::SignedUrl(url) => panic!("expected bytes, got a url: {url}"),
        };
        cleanup();
    }

    #[rocket::async_test]
    async fn download_file_not_found() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        let res = download_file(OWNER, None, "a.enc", &blob).await.unwrap_err();
        assert_eq!(GetFileError::NotFound, res);
        cleanup();
    }

    #[rocket::async_test]
    async fn download_file_scoped_to_owner() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"mine", &blob).await.unwrap();
        let res = download_file("other-owner", None, "a.enc", &blob)
            .await
            .unwrap_err();
        assert_eq!(GetFileError::NotFound, res);
        cleanup();
    }
}

mod delete_file_tests {
    use crate::service::file_service::{delete_file, upload_file};
    use crate::service::folder_service::get_folder;
    use crate::test::*;

    #[rocket::async_test]
    async fn delete_file_removes_object_and_record() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"hi", &blob).await.unwrap();
        delete_file(OWNER, None, "a.enc", &blob).await.unwrap();
        assert!(!blob_exists(None, "a.enc"));
        assert!(get_folder(OWNER, None).unwrap().files.is_empty());
        cleanup();
    }

    #[rocket::async_test]
    async fn delete_file_is_idempotent() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"hi", &blob).await.unwrap();
        delete_file(OWNER, None, "a.enc", &blob).await.unwrap();
        // a second delete of the same coordinates succeeds and changes nothing
        delete_file(OWNER, None, "a.enc", &blob).await.unwrap();
        assert!(get_folder(OWNER, None).unwrap().files.is_empty());
        cleanup();
    }

    #[rocket::async_test]
    async fn delete_file_never_uploaded() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        delete_file(OWNER, None, "ghost.enc", &blob).await.unwrap();
        cleanup();
    }
}

mod update_file_tests {
    use crate::model::error::file_errors::UpdateFileError;
    use crate::model::request::file_requests::UpdateFileRequest;
    use crate::service::file_service::{update_file, upload_file};
    use crate::storage::{object_key, BlobStore};
    use crate::test::*;

    fn request(folder_id: Option<u32>, name: &str, new_name: &str) -> UpdateFileRequest {
        UpdateFileRequest {
            folder_id,
            name: String::from(name),
            new_name: String::from(new_name),
        }
    }

    #[rocket::async_test]
    async fn update_file_works() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"hi", &blob).await.unwrap();
        let updated = update_file(OWNER, &request(None, "a.enc", "b.enc"), &blob)
            .await
            .unwrap();
        assert_eq!(String::from("b.enc"), updated.name);
        // old key gone, new key holds the bytes
        assert!(!blob_exists(None, "a.enc"));
        let bytes = blob.get(&object_key(OWNER, None, "b.enc")).await.unwrap();
        assert_eq!(b"hi".to_vec(), bytes);
        cleanup();
    }

    #[rocket::async_test]
    async fn update_file_target_name_taken() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"aaa", &blob).await.unwrap();
        upload_file(OWNER, None, "b.enc", "{}", b"bbb", &blob).await.unwrap();
        let res = update_file(OWNER, &request(None, "a.enc", "b.enc"), &blob)
            .await
            .unwrap_err();
        assert_eq!(UpdateFileError::AlreadyExists, res);
        // both objects are untouched
        let a = blob.get(&object_key(OWNER, None, "a.enc")).await.unwrap();
        let b = blob.get(&object_key(OWNER, None, "b.enc")).await.unwrap();
        assert_eq!(b"aaa".to_vec(), a);
        assert_eq!(b"bbb".to_vec(), b);
        cleanup();
    }

    #[rocket::async_test]
    async fn update_file_not_found() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        let res = update_file(OWNER, &request(None, "a.enc", "b.enc"), &blob)
            .await
            .unwrap_err();
        assert_eq!(UpdateFileError::NotFound, res);
        cleanup();
    }

    #[rocket::async_test]
    async fn update_file_folder_not_found() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        let res = update_file(OWNER, &request(Some(8), "a.enc", "b.enc"), &blob)
            .await
            .unwrap_err();
        assert_eq!(UpdateFileError::FolderNotFound, res);
        cleanup();
    }

    #[rocket::async_test]
    async fn update_file_same_name_is_a_no_op() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"hi", &blob).await.unwrap();
        let updated = update_file(OWNER, &request(None, "a.enc", "a.enc"), &blob)
            .await
            .unwrap();
        assert_eq!(String::from("a.enc"), updated.name);
        assert!(blob_exists(None, "a.enc"));
        cleanup();
    }

    #[rocket::async_test]
    async fn update_file_invalid_new_name() {
        refresh_db();
        remove_blobs();
        let blob = blob_store();
        upload_file(OWNER, None, "a.enc", "{}", b"hi", &blob).await.unwrap();
        let res = update_file(OWNER, &request(None, "a.enc", "b/c.enc"), &blob)
            .await
            .unwrap_err();
        assert_eq!(UpdateFileError::InvalidName, res);
        cleanup();
    }
}
