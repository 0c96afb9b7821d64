//! L2 SQLite-backed embedding cache.
//!
//! Survives process restarts: re-running on an unchanged project
//! doesn't pay for re-embedding. Falls back to an in-memory map when no
//! project directory is available (tests, ephemeral sessions).

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::debug;

pub struct L2Cache {
    conn: Option<Mutex<Connection>>,
    fallback: Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

impl L2Cache {
    pub fn new() -> Self {
        Self { conn: None, fallback: Mutex::new(std::collections::HashMap::new()) }
    }

    /// Open (or create) the embedding cache database alongside the
    /// project's main store.
    pub fn open(cache_path: &Path) -> Self {
        match Connection::open(cache_path) {
            Ok(conn) => {
                let _ = conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS embedding_cache (
                        content_hash TEXT PRIMARY KEY,
                        embedding BLOB NOT NULL
                    );
                    PRAGMA journal_mode = WAL;
                    PRAGMA synchronous = NORMAL;",
                );
                debug!(path = %cache_path.display(), "L2 embedding cache opened");
                Self { conn: Some(Mutex::new(conn)), fallback: Mutex::new(std::collections::HashMap::new()) }
            }
            Err(e) => {
                debug!(error = %e, "L2 embedding cache open failed, using in-memory fallback");
                Self::new()
            }
        }
    }

    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        if let Some(ref conn_mutex) = self.conn {
            if let Ok(conn) = conn_mutex.lock() {
                let result: Result<Vec<u8>, _> = conn.query_row(
                    "SELECT embedding FROM embedding_cache WHERE content_hash = ?1",
                    params![content_hash],
                    |row| row.get(0),
                );
                if let Ok(bytes) = result {
                    return Some(bytes_to_f32(&bytes));
                }
            }
            return None;
        }
        self.fallback.lock().ok()?.get(content_hash).map(|b| bytes_to_f32(b))
    }

    pub fn insert(&self, content_hash: String, embedding: &[f32]) {
        let bytes = f32_to_bytes(embedding);
        if let Some(ref conn_mutex) = self.conn {
            if let Ok(conn) = conn_mutex.lock() {
                let _ = conn.execute(
                    "INSERT OR REPLACE INTO embedding_cache (content_hash, embedding) VALUES (?1, ?2)",
                    params![content_hash, bytes],
                );
                return;
            }
        }
        if let Ok(mut map) = self.fallback.lock() {
            map.insert(content_hash, bytes);
        }
    }

    pub fn len(&self) -> usize {
        if let Some(ref conn_mutex) = self.conn {
            if let Ok(conn) = conn_mutex.lock() {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM embedding_cache", [], |row| row.get(0)).unwrap_or(0);
                return count as usize;
            }
        }
        self.fallback.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for L2Cache {
    fn default() -> Self {
        Self::new()
    }
}

fn f32_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_fallback() {
        let cache = L2Cache::new();
        let hash = "deadbeef".to_string();
        let embedding = vec![1.0f32, 2.5, -3.7, 0.0];
        cache.insert(hash.clone(), &embedding);
        assert_eq!(cache.get(&hash).unwrap(), embedding);
    }

    #[test]
    fn miss_returns_none() {
        let cache = L2Cache::new();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn sqlite_backed_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("embeddings_cache.db");

        {
            let cache = L2Cache::open(&db_path);
            cache.insert("persist-hash".to_string(), &[4.0, 5.0]);
        }
        {
            let cache = L2Cache::open(&db_path);
            assert_eq!(cache.get("persist-hash"), Some(vec![4.0, 5.0]));
        }
    }
}
