use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use succ_core::errors::{GraphError, SuccError, SuccResult};
use succ_core::memory::MemoryId;
use succ_core::models::{MemoryLink, RelationType};

use crate::to_storage_err;

/// Insert a link, normalized to `(min(source,target), max(source,target))`
/// so exactly one edge exists per unordered pair regardless of call order.
pub fn create_link(conn: &Connection, link: MemoryLink) -> SuccResult<MemoryLink> {
    let (source_id, target_id) = link.pair_key();
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM memory_links WHERE source_id = ?1 AND target_id = ?2",
            params![source_id as i64, target_id as i64],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    if existing.is_some() {
        return Err(SuccError::Graph(GraphError::DuplicateEdge {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }));
    }

    let now = Utc::now();
    conn.execute(
        "INSERT INTO memory_links (source_id, target_id, relation, weight, llm_enriched, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            source_id as i64,
            target_id as i64,
            link.relation.to_string(),
            link.weight,
            link.llm_enriched as i32,
            now.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(MemoryLink {
        id: conn.last_insert_rowid() as u64,
        source_id,
        target_id,
        relation: link.relation,
        weight: link.weight,
        llm_enriched: link.llm_enriched,
        created_at: now,
    })
}

pub fn delete_link(conn: &Connection, id: u64) -> SuccResult<()> {
    conn.execute("DELETE FROM memory_links WHERE id = ?1", params![id as i64])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn update_link(conn: &Connection, id: u64, relation: RelationType, weight: f64, llm_enriched: bool) -> SuccResult<()> {
    let rows = conn
        .execute(
            "UPDATE memory_links SET relation = ?2, weight = ?3, llm_enriched = ?4 WHERE id = ?1",
            params![id as i64, relation.to_string(), weight, llm_enriched as i32],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if rows == 0 {
        return Err(SuccError::NotFound(format!("link {id}")));
    }
    Ok(())
}

/// Returns `(outgoing, incoming)` where outgoing links have `memory_id`
/// as source and incoming have it as target. Undirected relations (per
/// `RelationType::is_directed`) are callers' concern to merge.
pub fn links_for(conn: &Connection, memory_id: MemoryId) -> SuccResult<(Vec<MemoryLink>, Vec<MemoryLink>)> {
    let mut stmt = conn
        .prepare(
            "SELECT id, source_id, target_id, relation, weight, llm_enriched, created_at
             FROM memory_links WHERE source_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let outgoing = stmt
        .query_map(params![memory_id as i64], |row| Ok(row_to_link(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<SuccResult<Vec<_>>>()?;

    let mut stmt = conn
        .prepare(
            "SELECT id, source_id, target_id, relation, weight, llm_enriched, created_at
             FROM memory_links WHERE target_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let incoming = stmt
        .query_map(params![memory_id as i64], |row| Ok(row_to_link(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect::<SuccResult<Vec<_>>>()?;

    Ok((outgoing, incoming))
}

pub fn list_all_links(conn: &Connection) -> SuccResult<Vec<MemoryLink>> {
    let mut stmt = conn
        .prepare("SELECT id, source_id, target_id, relation, weight, llm_enriched, created_at FROM memory_links")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_link(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

pub fn link_exists(conn: &Connection, a: MemoryId, b: MemoryId) -> SuccResult<bool> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memory_links WHERE source_id = ?1 AND target_id = ?2",
            params![lo as i64, hi as i64],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count > 0)
}

fn row_to_link(row: &rusqlite::Row<'_>) -> SuccResult<MemoryLink> {
    let relation_str: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at_str: String = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(MemoryLink {
        id: row.get::<_, i64>(0).map_err(|e| to_storage_err(e.to_string()))? as u64,
        source_id: row.get::<_, i64>(1).map_err(|e| to_storage_err(e.to_string()))? as MemoryId,
        target_id: row.get::<_, i64>(2).map_err(|e| to_storage_err(e.to_string()))? as MemoryId,
        relation: parse_relation(&relation_str)?,
        weight: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        llm_enriched: row.get::<_, i32>(5).map_err(|e| to_storage_err(e.to_string()))? != 0,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| to_storage_err(format!("parse datetime: {e}")))?,
    })
}

fn parse_relation(s: &str) -> SuccResult<RelationType> {
    RelationType::ALL
        .into_iter()
        .find(|r| r.to_string() == s)
        .ok_or_else(|| to_storage_err(format!("unknown relation: {s}")))
}
