use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// A schema step, applied once and recorded in the `log` table.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251207_0001_create_habits",
        description: "Created habits table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS habits (
            id              TEXT PRIMARY KEY,
            owner_id        TEXT NOT NULL,
            name            TEXT NOT NULL,
            description     TEXT,
            emoji           TEXT NOT NULL DEFAULT '',
            color_hex       TEXT NOT NULL DEFAULT '',
            frequency       TEXT NOT NULL CHECK(frequency IN ('everyDay','specificDays')),
            days_of_week    TEXT NOT NULL DEFAULT '[]',
            target_per_day  INTEGER NOT NULL DEFAULT 1 CHECK(target_per_day > 0),
            is_archived     INTEGER NOT NULL DEFAULT 0,
            sort_order      INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_habits_owner_order ON habits(owner_id, sort_order);
        "#,
    },
    Migration {
        version: "20251207_0002_create_habit_logs",
        description: "Created habit_logs table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS habit_logs (
            owner_id         TEXT NOT NULL,
            habit_id         TEXT NOT NULL,
            date_key         TEXT NOT NULL,
            completed_count  INTEGER NOT NULL DEFAULT 0 CHECK(completed_count >= 0),
            target_per_day   INTEGER NOT NULL DEFAULT 1,
            note             TEXT,
            created_at       TEXT NOT NULL,
            updated_at       TEXT,
            PRIMARY KEY (owner_id, habit_id, date_key)
        );

        CREATE INDEX IF NOT EXISTS idx_habit_logs_owner_date ON habit_logs(owner_id, date_key);
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [migration.version, migration.description],
    )?;
    tx.commit()?;

    info!(version = migration.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations, returning how many ran.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if is_applied(conn, migration.version)? {
            continue;
        }
        apply(conn, migration)?;
        applied += 1;
    }

    Ok(applied)
}
