//! Brute-force cosine-similarity scan. No vector index extension is
//! assumed to be loaded; this trades index build cost for simplicity,
//! acceptable at the per-project memory counts succ targets.

use rusqlite::Connection;

use succ_core::errors::SuccResult;
use succ_core::memory::MemoryId;

use super::blob::{bytes_to_f32_vec, cosine_similarity};
use crate::to_storage_err;

fn scan(conn: &Connection, embedding: &[f32]) -> SuccResult<Vec<(MemoryId, f64)>> {
    let mut stmt = conn
        .prepare("SELECT id, embedding FROM memories")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((id as MemoryId, blob))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored = Vec::new();
    for row in rows {
        let (id, blob) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let stored = bytes_to_f32_vec(&blob);
        if stored.len() != embedding.len() {
            continue;
        }
        let sim = cosine_similarity(embedding, &stored);
        scored.push((id, sim));
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(scored)
}

/// The single highest-similarity match above `threshold`, for save-path
/// dedup (spec.md §4.1).
pub fn find_similar(conn: &Connection, embedding: &[f32], threshold: f64) -> SuccResult<Option<(MemoryId, f64)>> {
    Ok(scan(conn, embedding)?.into_iter().find(|(_, sim)| *sim >= threshold))
}

/// Top-`k` matches above `threshold`.
pub fn search_by_vector(
    conn: &Connection,
    embedding: &[f32],
    k: usize,
    threshold: f64,
) -> SuccResult<Vec<(MemoryId, f64)>> {
    let mut scored = scan(conn, embedding)?;
    scored.retain(|(_, sim)| *sim >= threshold);
    scored.truncate(k);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-9);
    }
}
