use rusqlite::{params, Connection};

use succ_core::errors::SuccResult;
use succ_core::models::TokenEvent;

use crate::to_storage_err;

pub fn record(conn: &Connection, event: &TokenEvent) -> SuccResult<()> {
    conn.execute(
        "INSERT INTO token_events (event_type, query_count, full_source_tokens, returned_tokens, ts)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            serde_json::to_string(&event.event_type)
                .map_err(|e| to_storage_err(e.to_string()))?
                .trim_matches('"'),
            event.query_count,
            event.full_source_tokens,
            event.returned_tokens,
            event.ts.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
