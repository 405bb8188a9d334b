use crate::cli::commands::day_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::today::TodayView;
use crate::core::calendar::DateKey;
use crate::core::tracking::TrackLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{error_banner, header, info, progress_bar, warning};
use crate::utils::colors::{colorize_optional, colorize_progress};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Today { date } = cmd {
        let (calendar, day) = day_context(date, cfg)?;
        let mut pool = DbPool::new(&cfg.database)?;

        let outcome = TrackLogic::today(&mut pool, &cfg.owner, day, &calendar);
        if let Some(e) = outcome.error {
            error_banner("Today's habits", &e);
            return Err(e);
        }

        render_today(&outcome.value, day);
    }

    Ok(())
}

/// Print today's list; shared with `watch`.
pub(crate) fn render_today(view: &TodayView, day: DateKey) {
    header(format!("Today · {day}"));

    if view.items.is_empty() {
        info("Nothing scheduled for this day.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("", 2),
        Column::new("HABIT", 26),
        Column::new("PROGRESS", 8),
        Column::new("NOTE", 30),
    ]);

    for item in &view.items {
        let mark = if item.is_completed() { "✔" } else { "·" };
        table.add_row(vec![
            mark.to_string(),
            format!("{} {}", item.habit.emoji, item.habit.name),
            colorize_progress(
                &item.progress_text(),
                item.is_completed(),
                item.completed_count(),
            ),
            colorize_optional(item.log.as_ref().and_then(|l| l.note.as_deref())),
        ]);
    }

    print!("{}", table.render());

    let total = view.items.len();
    let done = view.completed();
    println!(
        "\n{done}/{total} completed {}",
        progress_bar(done as f64 / total as f64)
    );

    for issue in &view.integrity_issues {
        warning(format!(
            "{} logs stored for habit {} on {}; only the first is shown",
            issue.count, issue.habit_id, issue.date_key
        ));
    }
}
