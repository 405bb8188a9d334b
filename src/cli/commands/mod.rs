pub mod add;
pub mod archive;
pub mod config;
pub mod db;
pub mod del;
pub mod done;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod note;
pub mod show;
pub mod stats;
pub mod today;
pub mod watch;

use crate::config::Config;
use crate::core::calendar::{Calendar, DateKey};
use crate::errors::AppResult;
use chrono::Utc;

/// `--date` when given, otherwise the current habit day.
pub(crate) fn resolve_day(date: &Option<String>, calendar: &Calendar) -> AppResult<DateKey> {
    match date {
        Some(d) => DateKey::parse(d.trim()),
        None => Ok(calendar.today(Utc::now())),
    }
}

/// Calendar and target day in one go, for the date-driven commands.
pub(crate) fn day_context(date: &Option<String>, cfg: &Config) -> AppResult<(Calendar, DateKey)> {
    let calendar = cfg.calendar()?;
    let day = resolve_day(date, &calendar)?;
    Ok((calendar, day))
}
