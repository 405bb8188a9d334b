use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::habits::HabitLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { habit } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let target = HabitLogic::resolve(&mut pool, &cfg.owner, habit)?;

        let prompt = format!(
            "Delete '{}' and all of its logs? This action is irreversible.",
            target.name
        );
        if !confirm(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        HabitLogic::delete(&mut pool, &target)?;
        success(format!("Habit '{}' has been deleted.", target.name));
    }

    Ok(())
}
