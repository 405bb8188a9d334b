use crate::cli::commands::day_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::core::habits::HabitLogic;
use crate::core::insights::{RECENT_LOGS, StatsLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, progress_bar};
use crate::utils::colors::{CYAN, RESET, color_for_rate, colorize_optional, colorize_progress};
use crate::utils::table::{Column, Table};

const WRAP_WIDTH: usize = 72;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { habit, days, date } = cmd {
        let (calendar, today) = day_context(date, cfg)?;
        let days = days.unwrap_or(cfg.detail_window_days).max(1);

        let mut pool = DbPool::new(&cfg.database)?;
        let target = HabitLogic::resolve(&mut pool, &cfg.owner, habit)?;
        let detail = StatsLogic::habit_detail(&mut pool, &cfg.owner, &target, today, days)?;
        let h = &detail.habit;

        header(format!("{} {}", h.emoji, h.name));

        if let Some(desc) = &h.description {
            for line in textwrap::wrap(desc, WRAP_WIDTH) {
                println!("  {line}");
            }
            println!();
        }

        println!(
            "{CYAN}• Schedule:{RESET} {}",
            ScheduleEvaluator::schedule_description(h, &calendar)
        );
        println!("{CYAN}• Target:{RESET} {} per day", h.target_per_day);
        if h.is_archived {
            println!("{CYAN}• Status:{RESET} archived");
        }
        println!(
            "{CYAN}• Streak:{RESET} {} current, {} longest",
            detail.streaks.current, detail.streaks.longest
        );
        let rate = detail.recent_completion_rate;
        println!(
            "{CYAN}• Last {RECENT_LOGS} logs:{RESET} {}{}{RESET}\n",
            color_for_rate(rate),
            progress_bar(rate)
        );

        if detail.logs.is_empty() {
            info(format!("No logs in the last {days} days."));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("DATE", 10),
            Column::new("PROGRESS", 8),
            Column::new("NOTE", 40),
        ]);
        // newest first
        for log in detail.logs.iter().rev() {
            table.add_row(vec![
                log.date_key.clone(),
                colorize_progress(
                    &format!("{}/{}", log.completed_count, log.target_per_day),
                    log.is_completed(),
                    log.completed_count,
                ),
                colorize_optional(log.note.as_deref()),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
