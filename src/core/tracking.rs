use crate::core::Outcome;
use crate::core::calculator::schedule::ScheduleEvaluator;
use crate::core::calculator::today::{TodayItem, TodayView, TodayViewBuilder};
use crate::core::calendar::{Calendar, DateKey};
use crate::db::store::HabitStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Habit, HabitLog};
use chrono::{DateTime, Utc};

fn unavailable(e: AppError) -> AppError {
    match e {
        AppError::SourceUnavailable(_) => e,
        other => AppError::SourceUnavailable(other.to_string()),
    }
}

/// Day-to-day tracking: today's list, completions and notes.
pub struct TrackLogic;

impl TrackLogic {
    /// Today's due habits with progress.
    ///
    /// A failed fetch yields an empty view *and* the error, so the caller
    /// can tell "nothing due" from "could not load".
    pub fn today<S: HabitStore>(
        store: &mut S,
        owner_id: &str,
        today: DateKey,
        calendar: &Calendar,
    ) -> Outcome<TodayView> {
        let habits = match store.fetch_habits(owner_id) {
            Ok(h) => h,
            Err(e) => return Outcome::degraded(TodayView::default(), unavailable(e)),
        };
        let logs = match store.fetch_logs(owner_id, None, today) {
            Ok(l) => l,
            Err(e) => return Outcome::degraded(TodayView::default(), unavailable(e)),
        };

        Outcome::complete(TodayViewBuilder::build_today(&habits, &logs, today, calendar))
    }

    /// Add one completion to `habit` for `day` and persist it.
    ///
    /// Only habits due on `day` can be completed.
    pub fn mark_done<S: HabitStore>(
        store: &mut S,
        owner_id: &str,
        habit: &Habit,
        day: DateKey,
        calendar: &Calendar,
        clamp_to_target: bool,
        now: DateTime<Utc>,
    ) -> AppResult<TodayItem> {
        let habit_id = habit.persisted_id()?;
        if !ScheduleEvaluator::is_due(habit, &day, calendar) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not scheduled on {}",
                habit.name, day
            )));
        }

        let logs = store.fetch_logs(owner_id, Some(habit_id), day)?;
        let view = TodayViewBuilder::build_today(std::slice::from_ref(habit), &logs, day, calendar);
        let item = view
            .items
            .into_iter()
            .next()
            .unwrap_or_else(|| TodayItem {
                habit: habit.clone(),
                log: None,
            });

        let updated = TodayViewBuilder::increment_completion(&item, owner_id, day, clamp_to_target, now)?;
        store.upsert_log(&updated)?;
        store.audit(
            "done",
            &updated.key(),
            &format!(
                "'{}' {}/{} on {}",
                habit.name, updated.completed_count, updated.target_per_day, day
            ),
        )?;

        Ok(item.with_log(updated))
    }

    /// Set (or clear, with `None`) the note on `habit`'s log for `day`.
    /// The log is created when the habit has none for that day yet.
    pub fn set_note<S: HabitStore>(
        store: &mut S,
        owner_id: &str,
        habit: &Habit,
        day: DateKey,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<HabitLog> {
        let habit_id = habit.persisted_id()?;
        let existing = store
            .fetch_logs(owner_id, Some(habit_id), day)?
            .into_iter()
            .find(|l| l.date().ok() == Some(day));

        let base = match existing {
            Some(log) => log,
            None => HabitLog::new_for_day(habit, owner_id, day, now)?,
        };
        let updated = base.with_note(note, now);

        store.upsert_log(&updated)?;
        store.audit(
            "note",
            &updated.key(),
            &format!("Note on '{}' for {}", habit.name, day),
        )?;
        Ok(updated)
    }
}
