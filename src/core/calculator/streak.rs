use crate::core::calendar::DateKey;
use crate::models::HabitLog;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Streak as of the most recent log considered.
    pub current: u32,
    pub longest: u32,
}

pub struct StreakCalculator;

impl StreakCalculator {
    /// Current and longest runs of consecutive completed days.
    ///
    /// Only the given records are considered: a day without a log does not
    /// reset `current` by itself, the next completed log simply fails the
    /// one-day gap check. Logs with an unparseable date are skipped.
    pub fn streaks(logs: &[HabitLog]) -> Streaks {
        let dated = sorted_by_date(logs);

        let mut current = 0;
        let mut longest = 0;
        let mut previous: Option<DateKey> = None;

        for (date, log) in dated {
            if log.is_completed() {
                current = match previous {
                    Some(prev) if prev.days_until(&date) == 1 => current + 1,
                    _ => 1,
                };
                longest = longest.max(current);
            } else {
                current = 0;
            }
            previous = Some(date);
        }

        Streaks { current, longest }
    }

    /// Share of completed logs among the `last_n` most recent ones.
    pub fn recent_completion_rate(logs: &[HabitLog], last_n: usize) -> f64 {
        let dated = sorted_by_date(logs);
        let recent = &dated[dated.len().saturating_sub(last_n)..];
        if recent.is_empty() {
            return 0.0;
        }
        let completed = recent.iter().filter(|(_, log)| log.is_completed()).count();
        completed as f64 / recent.len() as f64
    }
}

/// Logs paired with their parsed day, oldest first; malformed dates dropped.
fn sorted_by_date(logs: &[HabitLog]) -> Vec<(DateKey, &HabitLog)> {
    let mut dated: Vec<(DateKey, &HabitLog)> = logs
        .iter()
        .filter_map(|log| match log.date() {
            Ok(date) => Some((date, log)),
            Err(e) => {
                warn!(habit_id = %log.habit_id, error = %e, "skipping log with malformed date");
                None
            }
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);
    dated
}
