use rusqlite::Connection;
use std::path::Path;

use crate::error::ClientResult;

pub fn initialize_db(conn: &Connection) -> ClientResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        ",
    )?;
    Ok(())
}

pub fn open_db(path: &Path) -> ClientResult<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    initialize_db(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub fn open_in_memory() -> ClientResult<Connection> {
    let conn = Connection::open_in_memory()?;
    initialize_db(&conn)?;
    Ok(conn)
}
