#[macro_use]
extern crate rocket;

use std::fs;
use std::path::Path;

use rocket::{Build, Rocket};

use handler::{
    file_handler::{delete_file, download_file, update_file, upload_file},
    folder_handler::{
        create_folder, delete_folder, export_folder, get_all_folders, get_folder, update_folder,
    },
};

use crate::repository::initialize_db;
use crate::storage::disk::DiskBlobStore;
use crate::storage::{blob_root, BlobStore};

mod config;
mod guard;
mod handler;
mod model;
mod repository;
mod service;
mod storage;
#[cfg(test)]
mod test;

/// scratch space for in-flight uploads and freshly written export archives
#[cfg(not(test))]
pub fn temp_dir() -> String {
    String::from("./.drive_server_temp")
}

#[cfg(test)]
pub fn temp_dir() -> String {
    format!("./.{}_temp", test::current_thread_name())
}

fn configure_logger() {
    let configured = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .apply();
    // a logger may already be installed when tests build several rockets
    if let Err(e) = configured {
        log::debug!("logger already configured: {e:?}");
    }
}

#[launch]
fn rocket() -> Rocket<Build> {
    configure_logger();
    initialize_db().unwrap();
    fs::remove_dir_all(Path::new(temp_dir().as_str()))
        .or(Ok::<(), ()>(()))
        .unwrap();
    fs::create_dir_all(Path::new(temp_dir().as_str())).unwrap();
    rocket::build()
        .manage(Box::new(DiskBlobStore::new(blob_root().as_str())) as Box<dyn BlobStore>)
        .mount(
            "/folders",
            routes![
                get_folder,
                get_all_folders,
                create_folder,
                update_folder,
                delete_folder,
                export_folder
            ],
        )
        .mount(
            "/files",
            routes![upload_file, download_file, update_file, delete_file],
        )
}
