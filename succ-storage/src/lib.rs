//! SQLite-backed implementation of `succ_core::traits::MemoryStore` (C1).
//!
//! One writer connection, a small round-robin pool of read-only
//! connections, WAL journaling. Migrations run once at `open`.

mod engine;
mod migrations;
mod pool;
mod queries;

pub use engine::StorageEngine;

use succ_core::errors::{StorageError, SuccError};

pub(crate) fn to_storage_err(msg: impl Into<String>) -> SuccError {
    SuccError::Storage(StorageError::Sqlite { message: msg.into() })
}
