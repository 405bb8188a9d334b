use crate::cli::commands::day_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::habits::HabitLogic;
use crate::core::tracking::TrackLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Note { habit, text, date } = cmd {
        let (_, day) = day_context(date, cfg)?;
        let note = Some(text.trim().to_string()).filter(|t| !t.is_empty());

        let mut pool = DbPool::new(&cfg.database)?;
        let target = HabitLogic::resolve(&mut pool, &cfg.owner, habit)?;
        let log = TrackLogic::set_note(&mut pool, &cfg.owner, &target, day, note, Utc::now())?;

        match log.note {
            Some(_) => success(format!("Note saved for '{}' on {}", target.name, day)),
            None => success(format!("Note cleared for '{}' on {}", target.name, day)),
        }
    }

    Ok(())
}
