use crate::cli::commands::today::render_today;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::today::TodayViewBuilder;
use crate::core::calendar::DateKey;
use crate::db::pool::DbPool;
use crate::db::store::HabitStore;
use crate::errors::{AppError, AppResult};
use crate::feed::{FeedEvent, FeedSession};
use crate::models::Habit;
use crate::ui::messages::{error_banner, info};
use chrono::Utc;
use std::time::Duration;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What the watch screen currently shows.
#[derive(Debug, Default)]
pub struct WatchState {
    habits: Option<Vec<Habit>>,
    shown_day: Option<DateKey>,
}

impl WatchState {
    /// Fold in a feed snapshot (if any) and tell whether the screen must be
    /// redrawn for `today`: on every new snapshot, and when the habit day
    /// has rolled over since the last draw.
    pub fn update(&mut self, habits: Option<Vec<Habit>>, today: DateKey) -> bool {
        let fresh = habits.is_some();
        if let Some(h) = habits {
            self.habits = Some(h);
        }
        self.habits.is_some() && (fresh || self.shown_day != Some(today))
    }

    pub fn habits(&self) -> &[Habit] {
        self.habits.as_deref().unwrap_or_default()
    }

    pub fn mark_shown(&mut self, day: DateKey) {
        self.shown_day = Some(day);
    }

    pub fn shown_day(&self) -> Option<DateKey> {
        self.shown_day
    }
}

/// Re-render today's list on every change until interrupted.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { interval } = cmd {
        let interval = Duration::from_secs((*interval).max(1));
        let calendar = cfg.calendar()?;
        let mut pool = DbPool::new(&cfg.database)?;

        let mut session = FeedSession::new();
        let feed = session.acquire(&cfg.database, &cfg.owner, interval)?;
        info("Watching for changes (Ctrl+C to stop)…");

        let mut state = WatchState::default();
        loop {
            let snapshot = match feed.next_event(interval) {
                Some(FeedEvent::Habits(habits)) => Some(habits),
                Some(FeedEvent::Failed(msg)) => {
                    error_banner("Habit feed", msg);
                    None
                }
                None if !feed.is_alive() => {
                    return Err(AppError::SourceUnavailable("habit feed stopped".into()));
                }
                None => None,
            };

            let today = calendar.today(Utc::now());
            if !state.update(snapshot, today) {
                continue;
            }

            print!("{CLEAR_SCREEN}");
            match pool.fetch_logs(&cfg.owner, None, today) {
                Ok(logs) => {
                    let view = TodayViewBuilder::build_today(state.habits(), &logs, today, &calendar);
                    render_today(&view, today);
                    state.mark_shown(today);
                }
                Err(e) => error_banner("Today's habits", e),
            }
        }
    }

    Ok(())
}
