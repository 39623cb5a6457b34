use rusqlite::Connection;

/// retrieves the schema version stored in the metadata table. Fails with
/// `QueryReturnedNoRows` (or a table-missing error) on a fresh database
pub fn get_version(con: &Connection) -> Result<String, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/metadata/get_version.sql"))?;
    pst.query_row([], |row| row.get(0))
}
