use crate::core::Outcome;
use crate::core::calculator::stats::StatsAggregator;
use crate::core::calculator::streak::{StreakCalculator, Streaks};
use crate::core::calendar::{Calendar, DateKey};
use crate::db::store::HabitStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Habit, HabitLog, StatsSummary};
use serde::Serialize;

/// Number of most recent logs behind the detail view's completion rate.
pub const RECENT_LOGS: usize = 7;

/// Everything the `show` command renders for one habit.
#[derive(Debug, Clone, Serialize)]
pub struct HabitDetail {
    pub habit: Habit,
    /// Oldest first.
    pub logs: Vec<HabitLog>,
    pub streaks: Streaks,
    pub recent_completion_rate: f64,
}

pub struct StatsLogic;

impl StatsLogic {
    /// Stats over the window ending at `today`.
    ///
    /// When the logs cannot be fetched the habit counts are still reported,
    /// with the completion fields zeroed and the error attached.
    pub fn summary<S: HabitStore>(
        store: &mut S,
        owner_id: &str,
        habits: &[Habit],
        today: DateKey,
        calendar: &Calendar,
        window_days: u32,
    ) -> Outcome<StatsSummary> {
        let window_days = window_days.max(1);
        let since = today
            .add_days(-(i64::from(window_days) - 1))
            .unwrap_or(today);

        match store.fetch_logs(owner_id, None, since) {
            Ok(logs) => Outcome::complete(StatsAggregator::compute_summary(
                habits,
                &logs,
                today,
                calendar,
                window_days,
            )),
            Err(e) => Outcome::degraded(
                StatsAggregator::partial_summary(habits, window_days),
                AppError::SourceUnavailable(e.to_string()),
            ),
        }
    }

    /// Logs of the last `days` days plus streaks for one habit.
    pub fn habit_detail<S: HabitStore>(
        store: &mut S,
        owner_id: &str,
        habit: &Habit,
        today: DateKey,
        days: u32,
    ) -> AppResult<HabitDetail> {
        let habit_id = habit.persisted_id()?;
        let since = today.add_days(-i64::from(days)).unwrap_or(today);

        let mut logs: Vec<HabitLog> = store
            .fetch_logs(owner_id, Some(habit_id), since)?
            .into_iter()
            .filter(|l| l.habit_id == habit_id)
            .filter(|l| matches!(l.date(), Ok(d) if d >= since && d <= today))
            .collect();
        logs.sort_by(|a, b| a.date_key.cmp(&b.date_key));

        Ok(HabitDetail {
            habit: habit.clone(),
            streaks: StreakCalculator::streaks(&logs),
            recent_completion_rate: StreakCalculator::recent_completion_rate(&logs, RECENT_LOGS),
            logs,
        })
    }
}
