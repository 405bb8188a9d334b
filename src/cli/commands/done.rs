use crate::cli::commands::day_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::habits::HabitLogic;
use crate::core::tracking::TrackLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Done {
        habit,
        date,
        no_clamp,
    } = cmd
    {
        let (calendar, day) = day_context(date, cfg)?;
        let clamp = cfg.clamp_to_target && !*no_clamp;

        let mut pool = DbPool::new(&cfg.database)?;
        let target = HabitLogic::resolve(&mut pool, &cfg.owner, habit)?;
        let item = TrackLogic::mark_done(
            &mut pool,
            &cfg.owner,
            &target,
            day,
            &calendar,
            clamp,
            Utc::now(),
        )?;

        if item.is_completed() {
            success(format!(
                "{} {} {} on {}: completed",
                item.habit.emoji,
                item.habit.name,
                item.progress_text(),
                day
            ));
        } else {
            info(format!(
                "{} {} {} on {}",
                item.habit.emoji,
                item.habit.name,
                item.progress_text(),
                day
            ));
        }
    }

    Ok(())
}
