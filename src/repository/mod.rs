use std::path::Path;

use rusqlite::{Connection, OpenFlags, Result};

pub mod file_repository;
pub mod folder_repository;
pub mod metadata_repository;

/// the schema version this build of the server expects to find in the
/// metadata table
static DB_VERSION: &str = "1";

/// creates a new connection and returns it, but panics if the connection could not be created
#[cfg(not(test))]
pub fn open_connection() -> Connection {
    use crate::config::DRIVE_SERVER_CONFIG;

    match Connection::open_with_flags(
        Path::new(DRIVE_SERVER_CONFIG.clone().database.location.as_str()),
        OpenFlags::default(),
    ) {
        Ok(con) => con,
        Err(error) => panic!("Failed to get a connection to the database!: {error}"),
    }
}

#[cfg(test)]
pub fn open_connection() -> Connection {
    let db_name = format!("{}.sqlite", crate::test::current_thread_name());
    match Connection::open_with_flags(Path::new(db_name.as_str()), OpenFlags::default()) {
        Ok(con) => con,
        Err(error) => panic!("Failed to get a connection to the database!: {error}"),
    }
}

/// runs init.sql on the database
fn create_db(con: &mut Connection) {
    let sql = include_str!("../assets/init.sql");
    con.execute_batch(sql).unwrap();
}

/// handles checking if the database exists and is at the expected version,
/// creating it if it isn't there yet
pub fn initialize_db() -> Result<()> {
    let mut con = open_connection();
    match metadata_repository::get_version(&con) {
        Ok(version) if version == DB_VERSION => { /* up to date - no op */ }
        Ok(version) => {
            log::warn!("Database reports version {version}, expected {DB_VERSION}. Continuing startup...");
        }
        Err(_) => {
            // tables haven't been created yet
            create_db(&mut con);
        }
    };
    con.close().unwrap();
    Ok(())
}
