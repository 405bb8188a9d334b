use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::core::habits::{HabitChanges, HabitLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        habit,
        name,
        description,
        emoji,
        color,
        days,
        every_day,
        target,
        order,
    } = cmd
    {
        let changes = HabitChanges {
            name: name.clone(),
            description: description.clone(),
            emoji: emoji.clone(),
            color_hex: color.clone(),
            days_of_week: days.as_ref().map(|d| d.iter().copied().collect()),
            every_day: *every_day,
            target_per_day: *target,
            sort_order: *order,
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let current = HabitLogic::resolve(&mut pool, &cfg.owner, habit)?;
        let updated = HabitLogic::edit(&mut pool, &current, &changes, Utc::now())?;

        let calendar = cfg.calendar()?;
        success(format!(
            "Updated {} {} ({}, {}x per day)",
            updated.emoji,
            updated.name,
            ScheduleEvaluator::schedule_description(&updated, &calendar),
            updated.target_per_day
        ));
    }

    Ok(())
}
