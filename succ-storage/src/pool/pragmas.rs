//! PRAGMA configuration applied to every connection.

use rusqlite::Connection;

use succ_core::errors::SuccResult;

use crate::to_storage_err;

pub fn apply_write_pragmas(conn: &Connection) -> SuccResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        PRAGMA auto_vacuum = INCREMENTAL;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn apply_read_pragmas(conn: &Connection) -> SuccResult<()> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -32000;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
