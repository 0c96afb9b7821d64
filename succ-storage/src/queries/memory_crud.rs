use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use succ_core::errors::SuccResult;
use succ_core::memory::{Memory, MemoryId, MemoryType, QualityFactors};

use super::blob::{bytes_to_f32_vec, f32_vec_to_bytes};
use crate::to_storage_err;

const SELECT_COLUMNS: &str = "id, content, embedding, tags, source, memory_type, quality_score,
     quality_factors, access_count, last_accessed, created_at, valid_from, valid_until,
     is_invariant, correction_count, invalidated_by";

pub fn insert_memory(conn: &Connection, memory: &Memory) -> SuccResult<MemoryId> {
    let tags_json = serde_json::to_string(&memory.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let factors_json =
        serde_json::to_string(&memory.quality_factors).map_err(|e| to_storage_err(e.to_string()))?;
    let blob = f32_vec_to_bytes(&memory.embedding);

    conn.execute(
        "INSERT INTO memories (
            content, embedding, embedding_dims, tags, source, memory_type, quality_score,
            quality_factors, access_count, last_accessed, created_at, valid_from, valid_until,
            is_invariant, correction_count, invalidated_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            memory.content,
            blob,
            memory.embedding.len() as i64,
            tags_json,
            memory.source,
            memory.memory_type.as_str(),
            memory.quality_score,
            factors_json,
            memory.access_count,
            memory.last_accessed.to_rfc3339(),
            memory.created_at.to_rfc3339(),
            memory.valid_from.map(|t| t.to_rfc3339()),
            memory.valid_until.map(|t| t.to_rfc3339()),
            memory.is_invariant as i32,
            memory.correction_count,
            memory.invalidated_by.map(|id| id as i64),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(conn.last_insert_rowid() as MemoryId)
}

/// The dimension already committed to the store, if any memory has
/// been written yet. `None` means the store is empty and any dimension
/// is still acceptable (spec.md §3/§8: "mixing dimensions is rejected
/// at write time", which only bites once a dimension is established).
pub fn expected_dimension(conn: &Connection) -> SuccResult<Option<usize>> {
    conn.query_row("SELECT embedding_dims FROM memories LIMIT 1", [], |row| row.get::<_, i64>(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
        .map(|dims| dims.map(|d| d as usize))
}

pub fn get_memory(conn: &Connection, id: MemoryId) -> SuccResult<Option<Memory>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories WHERE id = ?1");
    conn.query_row(&sql, params![id as i64], |row| Ok(row_to_memory(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .transpose()
}

pub fn delete_memory(conn: &Connection, id: MemoryId) -> SuccResult<()> {
    conn.execute("DELETE FROM memory_links WHERE source_id = ?1 OR target_id = ?1", params![id as i64])
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute("DELETE FROM memories WHERE id = ?1", params![id as i64])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_tags(conn: &Connection, id: MemoryId, tags: &[String]) -> SuccResult<()> {
    let tags_json = serde_json::to_string(tags).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = conn
        .execute("UPDATE memories SET tags = ?2 WHERE id = ?1", params![id as i64, tags_json])
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(succ_core::errors::SuccError::NotFound(format!("memory {id}")));
    }
    Ok(())
}

pub fn increment_access_batch(conn: &Connection, ids: &[MemoryId], now: DateTime<Utc>) -> SuccResult<()> {
    for id in ids {
        conn.execute(
            "UPDATE memories SET access_count = access_count + 1, last_accessed = ?2 WHERE id = ?1",
            params![*id as i64, now.to_rfc3339()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// `id` is the new, correcting memory: its `correction_count` goes up.
/// `invalidated` is the superseded memory: its `invalidated_by` is set
/// to `id` (spec.md §4.6 correction protocol).
pub fn increment_correction_count(conn: &Connection, id: MemoryId, invalidated: MemoryId) -> SuccResult<()> {
    let rows = conn
        .execute(
            "UPDATE memories SET correction_count = correction_count + 1 WHERE id = ?1",
            params![id as i64],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(succ_core::errors::SuccError::NotFound(format!("memory {id}")));
    }
    conn.execute(
        "UPDATE memories SET invalidated_by = ?2 WHERE id = ?1",
        params![invalidated as i64, id as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Sets `invalidated_by` alone, leaving `correction_count` untouched —
/// used by checkpoint restore once every original id has a new id
/// (`increment_correction_count` bumps the count too, which would
/// double-count a value already restored verbatim).
pub fn set_invalidated_by(conn: &Connection, id: MemoryId, invalidated_by: MemoryId) -> SuccResult<()> {
    let rows = conn
        .execute(
            "UPDATE memories SET invalidated_by = ?2 WHERE id = ?1",
            params![id as i64, invalidated_by as i64],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(succ_core::errors::SuccError::NotFound(format!("memory {id}")));
    }
    Ok(())
}

/// Bumps `correction_count` alone (reflection reinforcement), leaving
/// `invalidated_by` untouched.
pub fn reinforce(conn: &Connection, id: MemoryId) -> SuccResult<()> {
    let rows = conn
        .execute(
            "UPDATE memories SET correction_count = correction_count + 1 WHERE id = ?1",
            params![id as i64],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(succ_core::errors::SuccError::NotFound(format!("memory {id}")));
    }
    Ok(())
}

pub fn get_bulk(conn: &Connection, ids: &[MemoryId]) -> SuccResult<Vec<Memory>> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(memory) = get_memory(conn, *id)? {
            results.push(memory);
        }
    }
    Ok(results)
}

pub fn all_valid(conn: &Connection, now: DateTime<Utc>) -> SuccResult<Vec<Memory>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_memory(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let memory = row.map_err(|e| to_storage_err(e.to_string()))??;
        if memory.is_valid_at(now) {
            results.push(memory);
        }
    }
    Ok(results)
}

pub fn count_by_type(conn: &Connection) -> SuccResult<Vec<(MemoryType, usize)>> {
    let mut stmt = conn
        .prepare("SELECT memory_type, COUNT(*) FROM memories GROUP BY memory_type")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            let type_str: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((type_str, count as usize))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let (type_str, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let memory_type: MemoryType = type_str
            .parse()
            .map_err(|e: String| to_storage_err(format!("parse memory_type '{type_str}': {e}")))?;
        results.push((memory_type, count));
    }
    Ok(results)
}

pub fn recent(conn: &Connection, limit: usize) -> SuccResult<Vec<Memory>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM memories ORDER BY created_at DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_memory(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

pub(crate) fn row_to_memory(row: &rusqlite::Row<'_>) -> SuccResult<Memory> {
    let embedding_blob: Vec<u8> = row.get(2).map_err(|e| to_storage_err(e.to_string()))?;
    let tags_json: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let memory_type_str: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let factors_json: String = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let last_accessed_str: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(10).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_from_str: Option<String> = row.get(11).map_err(|e| to_storage_err(e.to_string()))?;
    let valid_until_str: Option<String> = row.get(12).map_err(|e| to_storage_err(e.to_string()))?;

    let parse_dt = |s: &str| -> SuccResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
    };

    Ok(Memory {
        id: row.get::<_, i64>(0).map_err(|e| to_storage_err(e.to_string()))? as MemoryId,
        content: row.get(1).map_err(|e| to_storage_err(e.to_string()))?,
        embedding: bytes_to_f32_vec(&embedding_blob),
        tags: serde_json::from_str(&tags_json).map_err(|e| to_storage_err(format!("parse tags: {e}")))?,
        source: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        memory_type: memory_type_str
            .parse()
            .map_err(|e: String| to_storage_err(format!("parse memory_type: {e}")))?,
        quality_score: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        quality_factors: serde_json::from_str::<QualityFactors>(&factors_json)
            .map_err(|e| to_storage_err(format!("parse quality_factors: {e}")))?,
        access_count: row.get::<_, i64>(8).map_err(|e| to_storage_err(e.to_string()))? as u64,
        last_accessed: parse_dt(&last_accessed_str)?,
        created_at: parse_dt(&created_at_str)?,
        valid_from: valid_from_str.as_deref().map(parse_dt).transpose()?,
        valid_until: valid_until_str.as_deref().map(parse_dt).transpose()?,
        is_invariant: row.get::<_, i32>(13).map_err(|e| to_storage_err(e.to_string()))? != 0,
        correction_count: row.get::<_, i64>(14).map_err(|e| to_storage_err(e.to_string()))? as u32,
        invalidated_by: row
            .get::<_, Option<i64>>(15)
            .map_err(|e| to_storage_err(e.to_string()))?
            .map(|v| v as MemoryId),
    })
}
