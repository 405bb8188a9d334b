use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::core::calendar::{Calendar, DateKey};
use crate::errors::AppResult;
use crate::models::{Habit, HabitLog};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// A habit due today together with today's log, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayItem {
    pub habit: Habit,
    pub log: Option<HabitLog>,
}

impl TodayItem {
    pub fn completed_count(&self) -> u32 {
        self.log.as_ref().map_or(0, |l| l.completed_count)
    }

    pub fn target_per_day(&self) -> u32 {
        self.habit.target_per_day
    }

    pub fn is_completed(&self) -> bool {
        self.log.as_ref().is_some_and(|l| l.is_completed())
    }

    /// "x/y" progress label.
    pub fn progress_text(&self) -> String {
        format!("{}/{}", self.completed_count(), self.target_per_day())
    }

    pub fn with_log(mut self, log: HabitLog) -> Self {
        self.log = Some(log);
        self
    }
}

/// More than one stored log for the same habit and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateLog {
    pub habit_id: String,
    pub date_key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodayView {
    pub items: Vec<TodayItem>,
    pub integrity_issues: Vec<DuplicateLog>,
}

impl TodayView {
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|i| i.is_completed()).count()
    }

    pub fn item_for(&self, habit_id: &str) -> Option<&TodayItem> {
        self.items
            .iter()
            .find(|i| i.habit.id.as_deref() == Some(habit_id))
    }
}

pub struct TodayViewBuilder;

impl TodayViewBuilder {
    /// Due habits for `today`, ordered by `sort_order` (stable).
    ///
    /// Logs for other days are ignored. When a habit has several logs for
    /// today the first one wins and the duplicate is reported.
    pub fn build_today(
        habits: &[Habit],
        logs_for_today: &[HabitLog],
        today: DateKey,
        calendar: &Calendar,
    ) -> TodayView {
        let mut by_habit: HashMap<&str, (&HabitLog, usize)> = HashMap::new();
        for log in logs_for_today {
            if log.date().ok() != Some(today) {
                continue;
            }
            by_habit
                .entry(log.habit_id.as_str())
                .and_modify(|(_, seen)| *seen += 1)
                .or_insert((log, 1));
        }

        let mut integrity_issues: Vec<DuplicateLog> = by_habit
            .iter()
            .filter(|(_, (_, seen))| *seen > 1)
            .map(|(habit_id, (_, seen))| DuplicateLog {
                habit_id: habit_id.to_string(),
                date_key: today.to_string(),
                count: *seen,
            })
            .collect();
        integrity_issues.sort_by(|a, b| a.habit_id.cmp(&b.habit_id));
        for issue in &integrity_issues {
            warn!(
                habit_id = %issue.habit_id,
                date = %issue.date_key,
                count = issue.count,
                "duplicate logs for one habit and day, using the first"
            );
        }

        let mut items: Vec<TodayItem> = habits
            .iter()
            .filter(|h| ScheduleEvaluator::is_due(h, &today, calendar))
            .map(|habit| TodayItem {
                habit: habit.clone(),
                log: habit
                    .id
                    .as_deref()
                    .and_then(|id| by_habit.get(id))
                    .map(|(log, _)| (*log).clone()),
            })
            .collect();
        items.sort_by_key(|i| i.habit.sort_order);

        TodayView {
            items,
            integrity_issues,
        }
    }

    /// Next value of the item's log after one more completion.
    ///
    /// A missing log is created first with the habit's current target.
    /// Nothing is persisted here; the caller upserts the returned log.
    pub fn increment_completion(
        item: &TodayItem,
        owner_id: &str,
        today: DateKey,
        clamp_to_target: bool,
        now: DateTime<Utc>,
    ) -> AppResult<HabitLog> {
        let current = match &item.log {
            Some(existing) => existing.clone(),
            None => HabitLog::new_for_day(&item.habit, owner_id, today, now)?,
        };
        Ok(current.incremented(clamp_to_target, now))
    }
}
