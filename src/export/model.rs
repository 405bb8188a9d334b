// src/export/model.rs

use crate::models::{Habit, HabitLog};
use serde::Serialize;

/// Flat row for log exports.
#[derive(Serialize, Clone, Debug)]
pub struct LogExport {
    pub habit_id: String,
    pub habit_name: String,
    pub date: String,
    pub completed_count: u32,
    pub target_per_day: u32,
    pub completed: bool,
    pub note: String,
}

impl LogExport {
    /// `habit` is `None` when the log belongs to a habit no longer stored.
    pub fn from_log(log: &HabitLog, habit: Option<&Habit>) -> Self {
        Self {
            habit_id: log.habit_id.clone(),
            habit_name: habit.map(|h| h.name.clone()).unwrap_or_default(),
            date: log.date_key.clone(),
            completed_count: log.completed_count,
            target_per_day: log.target_per_day,
            completed: log.is_completed(),
            note: log.note.clone().unwrap_or_default(),
        }
    }
}
