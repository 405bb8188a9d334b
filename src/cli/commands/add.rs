use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::core::habits::HabitLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::{Frequency, Habit};
use crate::ui::messages::success;
use chrono::Utc;
use std::collections::BTreeSet;

/// Handle the `add` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        name,
        description,
        emoji,
        color,
        days,
        target,
        order,
    } = cmd
    {
        let (frequency, days_of_week) = match days {
            Some(d) => (Frequency::SpecificDays, d.iter().copied().collect()),
            None => (Frequency::EveryDay, BTreeSet::new()),
        };

        let mut habit = Habit::new(&cfg.owner, name, frequency, days_of_week, *target, Utc::now())?
            .with_description(description.clone());
        if let Some(e) = emoji {
            habit = habit.with_emoji(e);
        }
        if let Some(c) = color {
            habit = habit.with_color(c);
        }

        let mut pool = DbPool::new(&cfg.database)?;
        let saved = HabitLogic::add(&mut pool, habit, *order)?;

        let calendar = cfg.calendar()?;
        success(format!(
            "Added {} {} ({}, {}x per day)",
            saved.emoji,
            saved.name,
            ScheduleEvaluator::schedule_description(&saved, &calendar),
            saved.target_per_day
        ));
    }

    Ok(())
}
