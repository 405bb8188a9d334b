use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::habits::HabitLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handles both `archive` and `unarchive`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (key, archive) = match cmd {
        Commands::Archive { habit } => (habit, true),
        Commands::Unarchive { habit } => (habit, false),
        _ => return Ok(()),
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let habit = HabitLogic::resolve(&mut pool, &cfg.owner, key)?;

    if habit.is_archived == archive {
        info(format!(
            "'{}' is already {}.",
            habit.name,
            if archive { "archived" } else { "active" }
        ));
        return Ok(());
    }

    let updated = HabitLogic::set_archived(&mut pool, &habit, archive)?;
    if updated.is_archived {
        success(format!("Archived '{}'", updated.name));
    } else {
        success(format!("Restored '{}'", updated.name));
    }

    Ok(())
}
