use super::habit::Habit;
use crate::core::calendar::DateKey;
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completion record of one habit on one day.
///
/// Identified by `(habit_id, date_key)`; storage upserts on that pair.
/// `date_key` keeps the raw stored text so that a malformed value can be
/// reported and skipped instead of failing the whole fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub habit_id: String,
    pub owner_id: String,
    pub date_key: String,
    pub completed_count: u32,
    /// Snapshot of the habit target when the log was created.
    pub target_per_day: u32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl HabitLog {
    /// Empty log for `day`, snapshotting the habit's current target.
    pub fn new_for_day(
        habit: &Habit,
        owner_id: &str,
        day: DateKey,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let habit_id = habit.persisted_id()?;
        Ok(Self {
            habit_id: habit_id.to_string(),
            owner_id: owner_id.to_string(),
            date_key: day.to_string(),
            completed_count: 0,
            target_per_day: habit.target_per_day,
            note: None,
            created_at: now,
            updated_at: None,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.completed_count >= self.target_per_day
    }

    pub fn date(&self) -> AppResult<DateKey> {
        DateKey::parse(&self.date_key)
    }

    /// Document key used by storage: `<habit>_<date>`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.habit_id, self.date_key)
    }

    /// Copy with one more completion, optionally capped at the target.
    pub fn incremented(&self, clamp_to_target: bool, now: DateTime<Utc>) -> Self {
        let mut copy = self.clone();
        copy.completed_count = copy.completed_count.saturating_add(1);
        if clamp_to_target && copy.completed_count > copy.target_per_day {
            copy.completed_count = copy.target_per_day;
        }
        copy.updated_at = Some(now);
        copy
    }

    pub fn with_note(&self, note: Option<String>, now: DateTime<Utc>) -> Self {
        let mut copy = self.clone();
        copy.note = note.filter(|n| !n.trim().is_empty());
        copy.updated_at = Some(now);
        copy
    }
}
