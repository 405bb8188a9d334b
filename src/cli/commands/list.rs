use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::db::pool::DbPool;
use crate::db::store::HabitStore;
use crate::errors::AppResult;
use crate::models::Habit;
use crate::ui::messages::{header, info};
use crate::utils::colors::{GREY, RESET, colorize_optional};
use crate::utils::table::{Column, Table};

const DESCRIPTION_WIDTH: usize = 36;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { all } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let habits: Vec<Habit> = pool
            .fetch_habits(&cfg.owner)?
            .into_iter()
            .filter(|h| *all || !h.is_archived)
            .collect();

        if habits.is_empty() {
            info("No habits yet. Create one with `habitflow add NAME`.");
            return Ok(());
        }

        let calendar = cfg.calendar()?;
        let mut table = Table::new(vec![
            Column::new("ORD", 4),
            Column::new("HABIT", 24),
            Column::new("SCHEDULE", 28),
            Column::new("TARGET", 6),
            Column::new("DESCRIPTION", DESCRIPTION_WIDTH),
            Column::new("ID", 8),
        ]);

        for habit in &habits {
            let mut name = format!("{} {}", habit.emoji, habit.name);
            if habit.is_archived {
                name = format!("{GREY}{name} (archived){RESET}");
            }

            let description = habit
                .description
                .as_deref()
                .map(|d| textwrap::wrap(d, DESCRIPTION_WIDTH))
                .unwrap_or_default();

            let short_id: String = habit
                .id
                .as_deref()
                .map(|id| id.chars().take(8).collect())
                .unwrap_or_default();

            table.add_row(vec![
                habit.sort_order.to_string(),
                name,
                ScheduleEvaluator::schedule_description(habit, &calendar),
                habit.target_per_day.to_string(),
                colorize_optional(description.first().map(|l| l.to_string()).as_deref()),
                short_id,
            ]);

            for line in description.iter().skip(1) {
                table.add_continuation(4, line);
            }
        }

        header(format!("Habits of {}", cfg.owner));
        print!("{}", table.render());
    }

    Ok(())
}
