use crate::db::store::HabitStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Frequency, Habit};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Optional field updates for the `edit` command.
#[derive(Debug, Default, Clone)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub color_hex: Option<String>,
    /// `Some(empty)` is allowed and yields "No days selected".
    pub days_of_week: Option<BTreeSet<u8>>,
    pub every_day: bool,
    pub target_per_day: Option<u32>,
    pub sort_order: Option<i32>,
}

impl HabitChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.emoji.is_none()
            && self.color_hex.is_none()
            && self.days_of_week.is_none()
            && !self.every_day
            && self.target_per_day.is_none()
            && self.sort_order.is_none()
    }

    fn apply_to(&self, habit: &mut Habit) {
        if let Some(name) = &self.name {
            habit.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            let trimmed = description.trim();
            habit.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(emoji) = &self.emoji {
            habit.emoji = emoji.clone();
        }
        if let Some(color) = &self.color_hex {
            habit.color_hex = color.clone();
        }
        if self.every_day {
            habit.frequency = Frequency::EveryDay;
        } else if let Some(days) = &self.days_of_week {
            habit.frequency = Frequency::SpecificDays;
            habit.days_of_week = days.clone();
        }
        if let Some(target) = self.target_per_day {
            habit.target_per_day = target;
        }
        if let Some(order) = self.sort_order {
            habit.sort_order = order;
        }
    }
}

/// High-level habit management on top of a [`HabitStore`].
pub struct HabitLogic;

impl HabitLogic {
    /// Find a habit by exact id, or by case-insensitive exact name.
    pub fn resolve<S: HabitStore>(store: &mut S, owner_id: &str, key: &str) -> AppResult<Habit> {
        let habits = store.fetch_habits(owner_id)?;

        if let Some(h) = habits.iter().find(|h| h.id.as_deref() == Some(key)) {
            return Ok(h.clone());
        }

        let wanted = key.trim().to_lowercase();
        let mut named = habits.into_iter().filter(|h| h.name.to_lowercase() == wanted);
        match (named.next(), named.next()) {
            (Some(h), None) => Ok(h),
            (Some(_), Some(_)) => Err(AppError::AmbiguousHabit(key.to_string())),
            (None, _) => Err(AppError::HabitNotFound(key.to_string())),
        }
    }

    /// Persist a new habit. Without an explicit order it goes last.
    pub fn add<S: HabitStore>(store: &mut S, habit: Habit, sort_order: Option<i32>) -> AppResult<Habit> {
        let order = match sort_order {
            Some(o) => o,
            None => match store.fetch_habits(&habit.owner_id)?.iter().map(|h| h.sort_order).max() {
                Some(last) => last.checked_add(1).ok_or_else(|| {
                    AppError::InvalidInput(
                        "no sort order left after the last habit, pass --order".into(),
                    )
                })?,
                None => 0,
            },
        };

        let saved = store.add_habit(&habit.with_sort_order(order))?;
        store.audit(
            "add",
            saved.id.as_deref().unwrap_or_default(),
            &format!("Added habit '{}'", saved.name),
        )?;
        Ok(saved)
    }

    pub fn edit<S: HabitStore>(
        store: &mut S,
        habit: &Habit,
        changes: &HabitChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Habit> {
        let id = habit.persisted_id()?.to_string();
        if changes.is_empty() {
            return Err(AppError::InvalidInput("nothing to change".into()));
        }

        let mut updated = habit.clone();
        changes.apply_to(&mut updated);
        updated.updated_at = Some(now);

        store.update_habit(&updated)?;
        store.audit("edit", &id, &format!("Edited habit '{}'", updated.name))?;
        Ok(updated)
    }

    pub fn set_archived<S: HabitStore>(store: &mut S, habit: &Habit, archived: bool) -> AppResult<Habit> {
        let id = habit.persisted_id()?.to_string();
        let updated = store.set_archived(habit, archived)?;

        let (op, verb) = if archived {
            ("archive", "Archived")
        } else {
            ("unarchive", "Restored")
        };
        store.audit(op, &id, &format!("{verb} habit '{}'", habit.name))?;
        Ok(updated)
    }

    pub fn delete<S: HabitStore>(store: &mut S, habit: &Habit) -> AppResult<()> {
        let id = habit.persisted_id()?.to_string();
        store.delete_habit(habit)?;
        store.audit("del", &id, &format!("Deleted habit '{}'", habit.name))?;
        Ok(())
    }
}
