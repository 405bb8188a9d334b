use crate::cli::commands::day_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::insights::StatsLogic;
use crate::db::pool::DbPool;
use crate::db::store::HabitStore;
use crate::errors::AppResult;
use crate::ui::messages::{error_banner, header, progress_bar};
use crate::utils::colors::{CYAN, GREEN, RESET, color_for_rate, colorize_optional};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { date, window } = cmd {
        let (calendar, today) = day_context(date, cfg)?;
        let window = window.unwrap_or(cfg.stats_window_days).max(1);

        let mut pool = DbPool::new(&cfg.database)?;
        let habits = pool.fetch_habits(&cfg.owner)?;
        let outcome = StatsLogic::summary(&mut pool, &cfg.owner, &habits, today, &calendar, window);
        let s = &outcome.value;

        header(format!("Stats · {window} days ending {today}"));

        println!(
            "{CYAN}• Habits:{RESET} {GREEN}{}{RESET} ({} active)",
            s.total_habits, s.active_habits
        );
        println!(
            "{CYAN}• Completed:{RESET} {} of {} scheduled",
            s.completed_slots, s.scheduled_slots
        );
        println!(
            "{CYAN}• Rate:{RESET} {}{}{RESET}",
            color_for_rate(s.completion_rate),
            progress_bar(s.completion_rate)
        );
        println!("{CYAN}• Completions:{RESET} {}", s.total_completions);
        println!(
            "{CYAN}• Best habit:{RESET} {}",
            colorize_optional(s.best_habit_name.as_deref())
        );

        if let Some(e) = &outcome.error {
            println!();
            error_banner("Completion stats", e);
        }
    }

    Ok(())
}
