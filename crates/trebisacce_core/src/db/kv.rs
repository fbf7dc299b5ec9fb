//! Raw string access to the `kv_store` table.
//!
//! Values are opaque to this layer; typed JSON handling lives in
//! `repo::record_store`.

use super::DbResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Reads the raw value stored under `key`.
pub fn kv_get(conn: &Connection, key: &str) -> DbResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

/// Inserts or replaces the value stored under `key`.
pub fn kv_set(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key, value],
    )?;
    Ok(())
}

/// Removes `key`. Returns whether a value existed.
pub fn kv_delete(conn: &Connection, key: &str) -> DbResult<bool> {
    let changed = conn.execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
    Ok(changed > 0)
}

/// Lists stored keys in ascending order.
pub fn kv_keys(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(keys)
}
