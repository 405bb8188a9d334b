use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};
use tracing::debug;

/// Append an audit row to the internal `log` table and return its id.
///
/// `target` is the habit id, `<habit>_<date>` log key, or whatever the
/// operation acted on; it may be empty.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![Local::now().to_rfc3339(), operation, target, message])?;

    let id = conn.last_insert_rowid();
    debug!(id, operation, target, "audit row written");
    Ok(id)
}
