//! Versioned migrations, applied in order and tracked in `schema_meta`.

mod v001_core_schema;

use rusqlite::Connection;

use succ_core::errors::SuccResult;

use crate::to_storage_err;

const MIGRATIONS: &[(u32, fn(&Connection) -> SuccResult<()>)] = &[(1, v001_core_schema::migrate)];

pub fn run_migrations(conn: &Connection) -> SuccResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_meta (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current: u32 = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    for (version, migrate) in MIGRATIONS {
        if *version > current {
            migrate(conn)?;
            conn.execute(
                "INSERT INTO schema_meta (key, value) VALUES ('version', ?1)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [version.to_string()],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }
    Ok(())
}
