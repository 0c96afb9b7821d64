//! v1: memories, document/code chunks, links, token events.

use rusqlite::Connection;

use succ_core::errors::SuccResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SuccResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            content            TEXT NOT NULL,
            embedding          BLOB NOT NULL,
            embedding_dims     INTEGER NOT NULL,
            tags               TEXT NOT NULL DEFAULT '[]',
            source             TEXT NOT NULL DEFAULT '',
            memory_type        TEXT NOT NULL,
            quality_score      REAL NOT NULL,
            quality_factors    TEXT NOT NULL DEFAULT '{}',
            access_count       INTEGER NOT NULL DEFAULT 0,
            last_accessed      TEXT NOT NULL,
            created_at         TEXT NOT NULL,
            valid_from         TEXT,
            valid_until        TEXT,
            is_invariant       INTEGER NOT NULL DEFAULT 0,
            correction_count   INTEGER NOT NULL DEFAULT 0,
            invalidated_by     INTEGER REFERENCES memories(id)
        );

        CREATE INDEX IF NOT EXISTS idx_memories_type ON memories(memory_type);
        CREATE INDEX IF NOT EXISTS idx_memories_created ON memories(created_at);
        CREATE INDEX IF NOT EXISTS idx_memories_invalidated ON memories(invalidated_by);

        CREATE TABLE IF NOT EXISTS document_chunks (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            file_path     TEXT NOT NULL,
            chunk_index   INTEGER NOT NULL,
            content       TEXT NOT NULL,
            start_line    INTEGER NOT NULL,
            end_line      INTEGER NOT NULL,
            embedding     BLOB NOT NULL,
            embedding_dims INTEGER NOT NULL,
            symbol_name   TEXT,
            symbol_type   TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            UNIQUE(file_path, chunk_index)
        );
        CREATE INDEX IF NOT EXISTS idx_doc_chunks_path ON document_chunks(file_path);

        CREATE TABLE IF NOT EXISTS code_chunks (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            file_path     TEXT NOT NULL,
            chunk_index   INTEGER NOT NULL,
            content       TEXT NOT NULL,
            start_line    INTEGER NOT NULL,
            end_line      INTEGER NOT NULL,
            embedding     BLOB NOT NULL,
            embedding_dims INTEGER NOT NULL,
            symbol_name   TEXT,
            symbol_type   TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            UNIQUE(file_path, chunk_index)
        );
        CREATE INDEX IF NOT EXISTS idx_code_chunks_path ON code_chunks(file_path);

        CREATE TABLE IF NOT EXISTS file_hashes (
            corpus        TEXT NOT NULL,
            file_path     TEXT NOT NULL,
            content_hash  TEXT NOT NULL,
            indexed_at    TEXT NOT NULL,
            PRIMARY KEY (corpus, file_path)
        );

        CREATE TABLE IF NOT EXISTS memory_links (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id     INTEGER NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            target_id     INTEGER NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            relation      TEXT NOT NULL,
            weight        REAL NOT NULL DEFAULT 1.0,
            llm_enriched  INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL,
            UNIQUE(source_id, target_id)
        );
        CREATE INDEX IF NOT EXISTS idx_links_source ON memory_links(source_id);
        CREATE INDEX IF NOT EXISTS idx_links_target ON memory_links(target_id);

        CREATE TABLE IF NOT EXISTS token_events (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            event_type          TEXT NOT NULL,
            query_count         INTEGER NOT NULL DEFAULT 1,
            full_source_tokens  INTEGER NOT NULL,
            returned_tokens     INTEGER NOT NULL,
            ts                  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_token_events_type ON token_events(event_type);

        CREATE TABLE IF NOT EXISTS schema_meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
