use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use succ_core::errors::SuccResult;

use super::pragmas::apply_write_pragmas;
use crate::to_storage_err;

/// The single write connection. SQLite only ever has one writer at a
/// time regardless of how many threads hold a handle, so this simply
/// serializes access behind a mutex rather than pretending to pool.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> SuccResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_write_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> SuccResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_write_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn with_conn<F, T>(&self, f: F) -> SuccResult<T>
    where
        F: FnOnce(&Connection) -> SuccResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
