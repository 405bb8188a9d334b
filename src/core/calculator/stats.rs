use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::core::calendar::{Calendar, DateKey};
use crate::models::{Habit, HabitLog, StatsSummary};
use std::collections::HashMap;
use tracing::warn;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

pub struct StatsAggregator;

impl StatsAggregator {
    /// Summary over the `window_days` days ending at `today`.
    ///
    /// `logs` may be wider than the window; anything outside it (or with a
    /// malformed date) is ignored. The best habit is the one with the most
    /// completions in the window; on a tie the habit listed first in
    /// `habits` wins. A habit with no completions is never the best.
    pub fn compute_summary(
        habits: &[Habit],
        logs: &[HabitLog],
        today: DateKey,
        calendar: &Calendar,
        window_days: u32,
    ) -> StatsSummary {
        let window_days = window_days.max(1);
        let days = today.window_ending(window_days);
        let since = days.first().copied().unwrap_or(today);

        let in_window: Vec<(DateKey, &HabitLog)> = logs
            .iter()
            .filter_map(|log| match log.date() {
                Ok(date) if date >= since && date <= today => Some((date, log)),
                Ok(_) => None,
                Err(e) => {
                    warn!(habit_id = %log.habit_id, error = %e, "ignoring log with malformed date");
                    None
                }
            })
            .collect();

        let mut by_key: HashMap<(&str, DateKey), &HabitLog> = HashMap::new();
        for (date, log) in &in_window {
            by_key.entry((log.habit_id.as_str(), *date)).or_insert(*log);
        }

        let active: Vec<&Habit> = habits.iter().filter(|h| !h.is_archived).collect();

        let mut scheduled_slots = 0;
        let mut completed_slots = 0;
        for day in &days {
            for habit in &active {
                if !ScheduleEvaluator::is_due(habit, day, calendar) {
                    continue;
                }
                scheduled_slots += 1;
                let done = habit
                    .id
                    .as_deref()
                    .and_then(|id| by_key.get(&(id, *day)))
                    .is_some_and(|log| log.is_completed());
                if done {
                    completed_slots += 1;
                }
            }
        }

        let completion_rate = if scheduled_slots == 0 {
            0.0
        } else {
            completed_slots as f64 / scheduled_slots as f64
        };

        let mut per_habit: HashMap<&str, u64> = HashMap::new();
        let mut total_completions = 0u64;
        for (_, log) in &in_window {
            let count = u64::from(log.completed_count);
            total_completions += count;
            *per_habit.entry(log.habit_id.as_str()).or_default() += count;
        }

        let mut best: Option<&Habit> = None;
        let mut best_count = 0u64;
        for habit in habits {
            let Some(id) = habit.id.as_deref() else {
                continue;
            };
            let count = per_habit.get(id).copied().unwrap_or(0);
            if count > best_count {
                best = Some(habit);
                best_count = count;
            }
        }

        StatsSummary {
            total_habits: habits.len(),
            active_habits: active.len(),
            window_days,
            scheduled_slots,
            completed_slots,
            completion_rate,
            best_habit_id: best.and_then(|h| h.id.clone()),
            best_habit_name: best.map(|h| h.name.clone()),
            total_completions,
        }
    }

    /// Habit counts only; used when the logs could not be loaded.
    pub fn partial_summary(habits: &[Habit], window_days: u32) -> StatsSummary {
        StatsSummary {
            total_habits: habits.len(),
            active_habits: habits.iter().filter(|h| !h.is_archived).count(),
            window_days: window_days.max(1),
            ..StatsSummary::default()
        }
    }
}
