use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};

use succ_core::errors::SuccResult;
use succ_core::models::{Chunk, FileHash};
use succ_core::traits::{ChunkCorpus, StaleReport};

use super::blob::{bytes_to_f32_vec, f32_vec_to_bytes};
use crate::to_storage_err;

fn table(corpus: ChunkCorpus) -> &'static str {
    match corpus {
        ChunkCorpus::Document => "document_chunks",
        ChunkCorpus::Code => "code_chunks",
    }
}

pub fn upsert_chunks(
    conn: &Connection,
    corpus: ChunkCorpus,
    file_path: &str,
    content_hash: &str,
    chunks: Vec<Chunk>,
) -> SuccResult<()> {
    let table = table(corpus);
    conn.execute(&format!("DELETE FROM {table} WHERE file_path = ?1"), params![file_path])
        .map_err(|e| to_storage_err(e.to_string()))?;

    for chunk in &chunks {
        let blob = f32_vec_to_bytes(&chunk.embedding);
        conn.execute(
            &format!(
                "INSERT INTO {table} (
                    file_path, chunk_index, content, start_line, end_line, embedding,
                    embedding_dims, symbol_name, symbol_type, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                chunk.file_path,
                chunk.chunk_index,
                chunk.content,
                chunk.start_line,
                chunk.end_line,
                blob,
                chunk.embedding.len() as i64,
                chunk.symbol_name,
                chunk.symbol_type,
                chunk.created_at.to_rfc3339(),
                chunk.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }

    conn.execute(
        "INSERT INTO file_hashes (corpus, file_path, content_hash, indexed_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(corpus, file_path) DO UPDATE SET
            content_hash = excluded.content_hash, indexed_at = excluded.indexed_at",
        params![corpus_key(corpus), file_path, content_hash, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

pub fn delete_by_path(conn: &Connection, corpus: ChunkCorpus, file_path: &str) -> SuccResult<()> {
    let table = table(corpus);
    conn.execute(&format!("DELETE FROM {table} WHERE file_path = ?1"), params![file_path])
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "DELETE FROM file_hashes WHERE corpus = ?1 AND file_path = ?2",
        params![corpus_key(corpus), file_path],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn chunks_for_path(conn: &Connection, corpus: ChunkCorpus, file_path: &str) -> SuccResult<Vec<Chunk>> {
    let table = table(corpus);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, file_path, chunk_index, content, start_line, end_line, embedding,
                    symbol_name, symbol_type, created_at, updated_at
             FROM {table} WHERE file_path = ?1 ORDER BY chunk_index"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![file_path], |row| Ok(row_to_chunk(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

pub fn all_chunks(conn: &Connection, corpus: ChunkCorpus) -> SuccResult<Vec<Chunk>> {
    let table = table(corpus);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, file_path, chunk_index, content, start_line, end_line, embedding,
                    symbol_name, symbol_type, created_at, updated_at
             FROM {table} ORDER BY file_path, chunk_index"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_chunk(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// A file is stale when its indexed content hash no longer matches the
/// hash on disk, or when it was removed entirely. Deletes stale/removed
/// file rows as it goes and reports counts (spec.md §3).
pub fn get_stale_files(conn: &Connection, corpus: ChunkCorpus, project_root: &Path) -> SuccResult<StaleReport> {
    let mut stmt = conn
        .prepare("SELECT file_path, content_hash FROM file_hashes WHERE corpus = ?1")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![corpus_key(corpus)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut total = 0usize;
    let mut stale = 0usize;
    let mut deleted = 0usize;

    for row in rows {
        let (file_path, indexed_hash) = row.map_err(|e| to_storage_err(e.to_string()))?;
        total += 1;

        let abs = project_root.join(&file_path);
        match std::fs::read_to_string(&abs) {
            Ok(content) => {
                let current_hash = FileHash::compute(&content);
                if current_hash != indexed_hash {
                    stale += 1;
                }
            }
            Err(_) => {
                stale += 1;
                delete_by_path(conn, corpus, &file_path)?;
                deleted += 1;
            }
        }
    }

    Ok(StaleReport { total, stale, deleted })
}

fn corpus_key(corpus: ChunkCorpus) -> &'static str {
    match corpus {
        ChunkCorpus::Document => "document",
        ChunkCorpus::Code => "code",
    }
}

fn row_to_chunk(row: &rusqlite::Row<'_>) -> SuccResult<Chunk> {
    let embedding_blob: Vec<u8> = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_at_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> SuccResult<chrono::DateTime<Utc>> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(Chunk {
        id: row.get::<_, i64>(0).map_err(|e| to_storage_err(e.to_string()))? as u64,
        file_path: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        chunk_index: row.get::<_, i64>(2).map_err(|e| to_storage_err(e.to_string()))? as u32,
        content: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        start_line: row.get::<_, i64>(4).map_err(|e| to_storage_err(e.to_string()))? as u32,
        end_line: row.get::<_, i64>(5).map_err(|e| to_storage_err(e.to_string()))? as u32,
        embedding: bytes_to_f32_vec(&embedding_blob),
        symbol_name: row.get(7).map_err(|e| to_storage_err(e.to_string()))?,
        symbol_type: row.get(8).map_err(|e| to_storage_err(e.to_string()))?,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
    })
}
