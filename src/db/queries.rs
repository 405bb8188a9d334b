use crate::core::calendar::DateKey;
use crate::errors::{AppError, AppResult};
use crate::models::{Frequency, Habit, HabitLog};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row, params};
use std::collections::BTreeSet;
use tracing::warn;

const HABIT_COLUMNS: &str = "id, owner_id, name, description, emoji, color_hex, frequency,
     days_of_week, target_per_day, is_archived, sort_order, created_at, updated_at";

const LOG_COLUMNS: &str = "habit_id, owner_id, date_key, completed_count, target_per_day,
     note, created_at, updated_at";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(idx, AppError::Other(format!("Invalid timestamp: {raw}"))))
}

fn parse_optional_timestamp(idx: usize, raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|s| parse_timestamp(idx, &s)).transpose()
}

pub fn map_habit_row(row: &Row) -> Result<Habit> {
    let frequency_str: String = row.get("frequency")?;
    let frequency = Frequency::from_db_str(&frequency_str).ok_or_else(|| {
        conversion_error(
            6,
            AppError::Other(format!("Invalid frequency: {frequency_str}")),
        )
    })?;

    let days_str: String = row.get("days_of_week")?;
    let days_of_week: BTreeSet<u8> = serde_json::from_str(&days_str)
        .map_err(|_| conversion_error(7, AppError::Other(format!("Invalid weekdays: {days_str}"))))?;

    let created_at: String = row.get("created_at")?;

    Ok(Habit {
        id: Some(row.get("id")?),
        owner_id: row.get("owner_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        emoji: row.get("emoji")?,
        color_hex: row.get("color_hex")?,
        frequency,
        days_of_week,
        target_per_day: row.get("target_per_day")?,
        is_archived: row.get::<_, i32>("is_archived")? == 1,
        sort_order: row.get("sort_order")?,
        created_at: parse_timestamp(11, &created_at)?,
        updated_at: parse_optional_timestamp(12, row.get("updated_at")?)?,
    })
}

pub fn map_log_row(row: &Row) -> Result<HabitLog> {
    let created_at: String = row.get("created_at")?;

    Ok(HabitLog {
        habit_id: row.get("habit_id")?,
        owner_id: row.get("owner_id")?,
        date_key: row.get("date_key")?,
        completed_count: row.get("completed_count")?,
        target_per_day: row.get("target_per_day")?,
        note: row.get("note")?,
        created_at: parse_timestamp(6, &created_at)?,
        updated_at: parse_optional_timestamp(7, row.get("updated_at")?)?,
    })
}

/// Collect mapped rows, dropping the ones that fail to decode.
fn collect_decoded<T>(rows: impl Iterator<Item = Result<T>>, what: &str) -> AppResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        match r {
            Ok(item) => out.push(item),
            Err(e @ rusqlite::Error::FromSqlConversionFailure(..))
            | Err(e @ rusqlite::Error::InvalidColumnType(..))
            | Err(e @ rusqlite::Error::IntegralValueOutOfRange(..)) => {
                warn!(error = %e, "failed to decode {what}, skipping row");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

pub fn select_habits(conn: &Connection, owner_id: &str) -> AppResult<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits
         WHERE owner_id = ?1
         ORDER BY sort_order ASC, created_at ASC"
    ))?;
    let rows = stmt.query_map([owner_id], map_habit_row)?;
    collect_decoded(rows, "habit")
}

pub fn select_logs(
    conn: &Connection,
    owner_id: &str,
    habit_id: Option<&str>,
    since: Option<DateKey>,
) -> AppResult<Vec<HabitLog>> {
    let since = since.map(|d| d.to_string()).unwrap_or_default();
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM habit_logs
         WHERE owner_id = ?1
           AND (?2 IS NULL OR habit_id = ?2)
           AND date_key >= ?3
         ORDER BY date_key ASC, habit_id ASC"
    ))?;
    let rows = stmt.query_map(params![owner_id, habit_id, since], map_log_row)?;
    collect_decoded(rows, "habit log")
}

fn days_to_db(days: &BTreeSet<u8>) -> AppResult<String> {
    Ok(serde_json::to_string(days)?)
}

pub fn insert_habit(conn: &Connection, habit: &Habit, id: &str) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO habits ({HABIT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ),
        params![
            id,
            habit.owner_id,
            habit.name,
            habit.description,
            habit.emoji,
            habit.color_hex,
            habit.frequency.to_db_str(),
            days_to_db(&habit.days_of_week)?,
            habit.target_per_day,
            if habit.is_archived { 1 } else { 0 },
            habit.sort_order,
            habit.created_at.to_rfc3339(),
            habit.updated_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

/// Update every mutable field of a persisted habit; returns rows touched.
pub fn update_habit(conn: &Connection, habit: &Habit, id: &str) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE habits
         SET name = ?1, description = ?2, emoji = ?3, color_hex = ?4,
             frequency = ?5, days_of_week = ?6, target_per_day = ?7,
             is_archived = ?8, sort_order = ?9, updated_at = ?10
         WHERE id = ?11 AND owner_id = ?12",
        params![
            habit.name,
            habit.description,
            habit.emoji,
            habit.color_hex,
            habit.frequency.to_db_str(),
            days_to_db(&habit.days_of_week)?,
            habit.target_per_day,
            if habit.is_archived { 1 } else { 0 },
            habit.sort_order,
            habit.updated_at.map(|t| t.to_rfc3339()),
            id,
            habit.owner_id,
        ],
    )?;
    Ok(changed)
}

/// Delete a habit and its logs in one transaction; returns habit rows removed.
pub fn delete_habit(conn: &mut Connection, owner_id: &str, id: &str) -> AppResult<usize> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM habit_logs WHERE owner_id = ?1 AND habit_id = ?2",
        [owner_id, id],
    )?;
    let removed = tx.execute(
        "DELETE FROM habits WHERE owner_id = ?1 AND id = ?2",
        [owner_id, id],
    )?;
    tx.commit()?;
    Ok(removed)
}

/// Insert or replace the log stored under `(owner, habit, day)`.
/// `created_at` of an existing row is preserved.
pub fn upsert_log(conn: &Connection, log: &HabitLog) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO habit_logs ({LOG_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(owner_id, habit_id, date_key) DO UPDATE SET
                completed_count = excluded.completed_count,
                target_per_day  = excluded.target_per_day,
                note            = excluded.note,
                updated_at      = excluded.updated_at"
        ),
        params![
            log.habit_id,
            log.owner_id,
            log.date_key,
            log.completed_count,
            log.target_per_day,
            log.note,
            log.created_at.to_rfc3339(),
            log.updated_at.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}
