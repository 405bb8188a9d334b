//! The storage seam used by the application logic, and its SQLite backing.

use crate::core::calendar::DateKey;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Habit, HabitLog};
use uuid::Uuid;

/// Durable home of habits and logs for one or more owners.
pub trait HabitStore {
    /// Habits of `owner_id`, ordered by `sort_order` ascending.
    fn fetch_habits(&mut self, owner_id: &str) -> AppResult<Vec<Habit>>;

    /// Logs of `owner_id` dated on or after `since`, optionally for one habit.
    /// Callers must still filter: the date bound may be looser than asked.
    fn fetch_logs(
        &mut self,
        owner_id: &str,
        habit_id: Option<&str>,
        since: DateKey,
    ) -> AppResult<Vec<HabitLog>>;

    /// Insert or replace the log keyed by `(owner, habit, day)`.
    fn upsert_log(&mut self, log: &HabitLog) -> AppResult<()>;

    /// Persist a new habit and return it with its assigned id.
    fn add_habit(&mut self, habit: &Habit) -> AppResult<Habit>;

    fn update_habit(&mut self, habit: &Habit) -> AppResult<()>;

    fn set_archived(&mut self, habit: &Habit, archived: bool) -> AppResult<Habit> {
        let mut updated = habit.clone();
        updated.is_archived = archived;
        updated.updated_at = Some(chrono::Utc::now());
        self.update_habit(&updated)?;
        Ok(updated)
    }

    fn delete_habit(&mut self, habit: &Habit) -> AppResult<()>;

    /// Record an audit line. Stores without an audit trail ignore it.
    fn audit(&mut self, _operation: &str, _target: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }
}

impl HabitStore for DbPool {
    fn fetch_habits(&mut self, owner_id: &str) -> AppResult<Vec<Habit>> {
        queries::select_habits(&self.conn, owner_id)
    }

    fn fetch_logs(
        &mut self,
        owner_id: &str,
        habit_id: Option<&str>,
        since: DateKey,
    ) -> AppResult<Vec<HabitLog>> {
        queries::select_logs(&self.conn, owner_id, habit_id, Some(since))
    }

    fn upsert_log(&mut self, log: &HabitLog) -> AppResult<()> {
        if log.habit_id.is_empty() {
            return Err(AppError::MissingIdentity("habit log".into()));
        }
        if log.owner_id.is_empty() {
            return Err(AppError::InvalidInput("habit log has no owner".into()));
        }
        queries::upsert_log(&self.conn, log)
    }

    fn add_habit(&mut self, habit: &Habit) -> AppResult<Habit> {
        habit.validate()?;
        let id = Uuid::new_v4().to_string();
        queries::insert_habit(&self.conn, habit, &id)?;

        let mut saved = habit.clone();
        saved.id = Some(id);
        Ok(saved)
    }

    fn update_habit(&mut self, habit: &Habit) -> AppResult<()> {
        let id = habit.persisted_id()?;
        habit.validate()?;
        if queries::update_habit(&self.conn, habit, id)? == 0 {
            return Err(AppError::HabitNotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_habit(&mut self, habit: &Habit) -> AppResult<()> {
        let id = habit.persisted_id()?.to_string();
        let owner = habit.owner_id.clone();
        let removed = self.with_conn(|conn| queries::delete_habit(conn, &owner, &id))?;
        if removed == 0 {
            return Err(AppError::HabitNotFound(id));
        }
        Ok(())
    }

    fn audit(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.conn, operation, target, message)?;
        Ok(())
    }
}
