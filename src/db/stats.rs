use crate::core::calendar::DateKey;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

/// Whole-file figures shown by `db --info` (all owners).
#[derive(Debug, Default)]
pub struct DbSummary {
    pub size_bytes: u64,
    pub habits: i64,
    pub archived: i64,
    pub owners: i64,
    pub logs: i64,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
}

impl DbSummary {
    pub fn collect(pool: &DbPool, db_path: &str) -> AppResult<Self> {
        let (habits, archived, owners) = pool.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(is_archived), 0), COUNT(DISTINCT owner_id)
             FROM habits",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?;

        let (logs, first_day, last_day) = pool.conn.query_row(
            "SELECT COUNT(*), MIN(date_key), MAX(date_key) FROM habit_logs",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?;

        Ok(Self {
            size_bytes: fs::metadata(db_path).map(|m| m.len()).unwrap_or(0),
            habits,
            archived,
            owners,
            logs,
            first_day,
            last_day,
        })
    }

    /// Logs per calendar day over the logged range.
    pub fn logs_per_day(&self) -> Option<f64> {
        let first = DateKey::parse(self.first_day.as_deref()?).ok()?;
        let last = DateKey::parse(self.last_day.as_deref()?).ok()?;
        let span = (first.days_until(&last) + 1).max(1);
        Some(self.logs as f64 / span as f64)
    }
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let s = DbSummary::collect(pool, db_path)?;
    let label = |name: &str| format!("{CYAN}• {name}:{RESET}");
    let or_dash = |d: &Option<String>| d.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!();
    println!("{} {YELLOW}{db_path}{RESET}", label("File"));
    println!(
        "{} {:.2} MB",
        label("Size"),
        s.size_bytes as f64 / (1024.0 * 1024.0)
    );
    println!(
        "{} {GREEN}{}{RESET} ({} archived, {} owner(s))",
        label("Habits"),
        s.habits,
        s.archived,
        s.owners
    );
    println!("{} {GREEN}{}{RESET}", label("Logs"), s.logs);
    println!("{}", label("Date range"));
    println!("    from: {}", or_dash(&s.first_day));
    println!("    to:   {}", or_dash(&s.last_day));
    if let Some(avg) = s.logs_per_day() {
        println!("{} {avg:.2}", label("Average logs/day"));
    }
    println!();

    Ok(())
}
