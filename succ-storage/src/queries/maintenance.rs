use rusqlite::Connection;

use succ_core::errors::SuccResult;

use crate::to_storage_err;

pub fn full_vacuum(conn: &Connection) -> SuccResult<()> {
    conn.execute_batch("VACUUM").map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn wal_checkpoint(conn: &Connection) -> SuccResult<()> {
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn integrity_check(conn: &Connection) -> SuccResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result == "ok")
}
