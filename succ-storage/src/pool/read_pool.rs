//! Round-robin pool of read-only connections. Concurrent with the
//! writer via WAL; never blocked by it.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::Connection;

use succ_core::errors::SuccResult;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

const DEFAULT_POOL_SIZE: usize = 4;
const MAX_POOL_SIZE: usize = 8;

pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    pub fn open(path: &Path, pool_size: usize) -> SuccResult<Self> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            apply_read_pragmas(&conn)?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self { connections, next: AtomicUsize::new(0) })
    }

    /// In-memory read connections are isolated databases and cannot see
    /// the writer's changes; callers route reads through the writer
    /// instead (see `StorageEngine::use_read_pool`).
    pub fn open_in_memory(pool_size: usize) -> SuccResult<Self> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
            apply_read_pragmas(&conn)?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self { connections, next: AtomicUsize::new(0) })
    }

    pub fn with_conn<F, T>(&self, f: F) -> SuccResult<T>
    where
        F: FnOnce(&Connection) -> SuccResult<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|e| to_storage_err(format!("read pool lock poisoned: {e}")))?;
        f(&guard)
    }

    pub fn default_size() -> usize {
        DEFAULT_POOL_SIZE
    }
}
