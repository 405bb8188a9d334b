use chrono::FixedOffset;
use habitflow::core::calendar::{Calendar, DateKey};
use habitflow::core::habits::{HabitChanges, HabitLogic};
use habitflow::core::insights::StatsLogic;
use habitflow::core::tracking::TrackLogic;
use habitflow::db::{DbPool, HabitStore};
use habitflow::errors::{AppError, AppResult};
use habitflow::export::{ExportFormat, ExportLogic};
use habitflow::models::{Frequency, Habit, HabitLog};
use std::collections::BTreeSet;

mod common;
use common::{OWNER, at, every_day, key, log};

fn utc() -> Calendar {
    Calendar::fixed(FixedOffset::east_opt(0).unwrap())
}

fn new_habit(name: &str, target: u32) -> Habit {
    Habit::new(
        OWNER,
        name,
        Frequency::EveryDay,
        BTreeSet::new(),
        target,
        at(2025, 12, 1, 8),
    )
    .unwrap()
}

fn pool_with(names: &[&str]) -> (DbPool, Vec<Habit>) {
    let mut pool = DbPool::in_memory().unwrap();
    let habits = names
        .iter()
        .map(|n| HabitLogic::add(&mut pool, new_habit(n, 1), None).unwrap())
        .collect();
    (pool, habits)
}

/// Store whose reads can be switched to fail, for the degraded paths.
struct FlakyStore {
    habits: Vec<Habit>,
    logs: Vec<HabitLog>,
    fail_habits: bool,
    fail_logs: bool,
}

impl FlakyStore {
    fn new(habits: Vec<Habit>) -> Self {
        Self {
            habits,
            logs: Vec::new(),
            fail_habits: false,
            fail_logs: false,
        }
    }
}

impl HabitStore for FlakyStore {
    fn fetch_habits(&mut self, _owner_id: &str) -> AppResult<Vec<Habit>> {
        if self.fail_habits {
            return Err(AppError::Other("network down".into()));
        }
        Ok(self.habits.clone())
    }

    fn fetch_logs(
        &mut self,
        _owner_id: &str,
        habit_id: Option<&str>,
        since: DateKey,
    ) -> AppResult<Vec<HabitLog>> {
        if self.fail_logs {
            return Err(AppError::SourceUnavailable("logs offline".into()));
        }
        Ok(self
            .logs
            .iter()
            .filter(|l| habit_id.is_none_or(|id| l.habit_id == id))
            .filter(|l| l.date().is_ok_and(|d| d >= since))
            .cloned()
            .collect())
    }

    fn upsert_log(&mut self, log: &HabitLog) -> AppResult<()> {
        self.logs
            .retain(|l| !(l.habit_id == log.habit_id && l.date_key == log.date_key));
        self.logs.push(log.clone());
        Ok(())
    }

    fn add_habit(&mut self, habit: &Habit) -> AppResult<Habit> {
        self.habits.push(habit.clone());
        Ok(habit.clone())
    }

    fn update_habit(&mut self, _habit: &Habit) -> AppResult<()> {
        Ok(())
    }

    fn delete_habit(&mut self, _habit: &Habit) -> AppResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SQLite store
// ---------------------------------------------------------------------------

#[test]
fn test_add_assigns_id_and_appends_order() {
    let (mut pool, habits) = pool_with(&["Read", "Walk", "Write"]);
    assert!(habits.iter().all(|h| h.id.is_some()));

    let stored = pool.fetch_habits(OWNER).unwrap();
    let names: Vec<&str> = stored.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Read", "Walk", "Write"]);
    assert_eq!(
        stored.iter().map(|h| h.sort_order).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    // another owner sees nothing
    assert!(pool.fetch_habits("someone-else").unwrap().is_empty());
}

#[test]
fn test_add_after_max_sort_order_is_rejected() {
    let mut pool = DbPool::in_memory().unwrap();
    HabitLogic::add(&mut pool, new_habit("Last", 1), Some(i32::MAX)).unwrap();

    let err = HabitLogic::add(&mut pool, new_habit("Next", 1), None).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    // an explicit order still works
    let saved = HabitLogic::add(&mut pool, new_habit("Next", 1), Some(3)).unwrap();
    assert_eq!(saved.sort_order, 3);
    assert_eq!(pool.fetch_habits(OWNER).unwrap().len(), 2);
}

#[test]
fn test_migrations_run_once() {
    let pool = DbPool::in_memory().unwrap();
    let applied: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(applied, 2);

    let again = habitflow::db::initialize::init_db(&pool.conn).unwrap();
    assert_eq!(again, 0);
}

#[test]
fn test_upsert_keeps_one_log_per_habit_and_day() {
    let (mut pool, habits) = pool_with(&["Water"]);
    let id = habits[0].id.clone().unwrap();

    let mut first = log(&id, "2025-12-07", 1, 3);
    first.owner_id = OWNER.into();
    pool.upsert_log(&first).unwrap();

    let mut second = first.clone();
    second.completed_count = 2;
    second.note = Some("two glasses".into());
    pool.upsert_log(&second).unwrap();

    let logs = pool.fetch_logs(OWNER, Some(&id), key("2025-12-01")).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].completed_count, 2);
    assert_eq!(logs[0].note.as_deref(), Some("two glasses"));
}

#[test]
fn test_fetch_logs_respects_since() {
    let (mut pool, habits) = pool_with(&["Water"]);
    let id = habits[0].id.clone().unwrap();
    for d in ["2025-12-01", "2025-12-05", "2025-12-07"] {
        pool.upsert_log(&log(&id, d, 1, 1)).unwrap();
    }

    let logs = pool.fetch_logs(OWNER, None, key("2025-12-05")).unwrap();
    let days: Vec<&str> = logs.iter().map(|l| l.date_key.as_str()).collect();
    assert_eq!(days, vec!["2025-12-05", "2025-12-07"]);
}

#[test]
fn test_delete_removes_habit_and_its_logs() {
    let (mut pool, habits) = pool_with(&["Read", "Walk"]);
    let read = habits[0].clone();
    let walk_id = habits[1].id.clone().unwrap();
    pool.upsert_log(&log(read.id.as_deref().unwrap(), "2025-12-07", 1, 1))
        .unwrap();
    pool.upsert_log(&log(&walk_id, "2025-12-07", 1, 1)).unwrap();

    HabitLogic::delete(&mut pool, &read).unwrap();

    let left = pool.fetch_habits(OWNER).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, "Walk");
    let logs = pool.fetch_logs(OWNER, None, key("2025-01-01")).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].habit_id, walk_id);

    // deleting twice reports the missing habit
    assert!(matches!(
        HabitLogic::delete(&mut pool, &read),
        Err(AppError::HabitNotFound(_))
    ));
}

#[test]
fn test_unsaved_habit_has_no_identity() {
    let mut pool = DbPool::in_memory().unwrap();
    let draft = new_habit("Draft", 1);

    assert!(matches!(
        pool.update_habit(&draft),
        Err(AppError::MissingIdentity(_))
    ));
    assert!(matches!(
        HabitLogic::set_archived(&mut pool, &draft, true),
        Err(AppError::MissingIdentity(_))
    ));
    assert!(matches!(
        pool.delete_habit(&draft),
        Err(AppError::MissingIdentity(_))
    ));
}

#[test]
fn test_resolve_by_id_or_name() {
    let (mut pool, habits) = pool_with(&["Read", "Walk"]);
    let id = habits[1].id.clone().unwrap();

    assert_eq!(HabitLogic::resolve(&mut pool, OWNER, &id).unwrap().name, "Walk");
    assert_eq!(
        HabitLogic::resolve(&mut pool, OWNER, "read").unwrap().name,
        "Read"
    );
    assert!(matches!(
        HabitLogic::resolve(&mut pool, OWNER, "Swim"),
        Err(AppError::HabitNotFound(_))
    ));

    HabitLogic::add(&mut pool, new_habit("READ", 1), None).unwrap();
    assert!(matches!(
        HabitLogic::resolve(&mut pool, OWNER, "Read"),
        Err(AppError::AmbiguousHabit(_))
    ));
}

#[test]
fn test_edit_and_archive_round_trip_through_store() {
    let (mut pool, habits) = pool_with(&["Gym"]);
    let changes = HabitChanges {
        days_of_week: Some([2, 4, 6].into_iter().collect()),
        target_per_day: Some(2),
        description: Some("  leg day  ".into()),
        ..HabitChanges::default()
    };
    let edited = HabitLogic::edit(&mut pool, &habits[0], &changes, at(2025, 12, 2, 9)).unwrap();
    assert_eq!(edited.frequency, Frequency::SpecificDays);

    let archived = HabitLogic::set_archived(&mut pool, &edited, true).unwrap();
    assert!(archived.is_archived);

    let stored = &pool.fetch_habits(OWNER).unwrap()[0];
    assert_eq!(stored.frequency, Frequency::SpecificDays);
    assert_eq!(stored.days_of_week, BTreeSet::from([2, 4, 6]));
    assert_eq!(stored.target_per_day, 2);
    assert_eq!(stored.description.as_deref(), Some("leg day"));
    assert!(stored.is_archived);
    assert!(stored.updated_at.is_some());

    assert!(matches!(
        HabitLogic::edit(&mut pool, stored, &HabitChanges::default(), at(2025, 12, 2, 9)),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn test_audit_rows_written_for_mutations() {
    let (mut pool, habits) = pool_with(&["Read"]);
    TrackLogic::mark_done(
        &mut pool,
        OWNER,
        &habits[0],
        key("2025-12-07"),
        &utc(),
        true,
        at(2025, 12, 7, 9),
    )
    .unwrap();

    let ops: Vec<String> = pool
        .conn
        .prepare("SELECT operation FROM log WHERE operation != 'migration_applied' ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(ops, vec!["add", "done"]);
}

// ---------------------------------------------------------------------------
// Tracking and stats over a store
// ---------------------------------------------------------------------------

#[test]
fn test_mark_done_twice_reaches_target() {
    let mut pool = DbPool::in_memory().unwrap();
    let habit = HabitLogic::add(&mut pool, new_habit("Water", 2), None).unwrap();
    let day = key("2025-12-07");

    let first =
        TrackLogic::mark_done(&mut pool, OWNER, &habit, day, &utc(), true, at(2025, 12, 7, 9))
            .unwrap();
    assert_eq!(first.progress_text(), "1/2");
    assert!(!first.is_completed());

    let second =
        TrackLogic::mark_done(&mut pool, OWNER, &habit, day, &utc(), true, at(2025, 12, 7, 12))
            .unwrap();
    assert!(second.is_completed());

    let third =
        TrackLogic::mark_done(&mut pool, OWNER, &habit, day, &utc(), true, at(2025, 12, 7, 18))
            .unwrap();
    assert_eq!(third.completed_count(), 2);

    let view = TrackLogic::today(&mut pool, OWNER, day, &utc());
    assert!(view.is_complete());
    assert_eq!(view.value.completed(), 1);
}

#[test]
fn test_mark_done_rejects_habit_not_due() {
    let mut pool = DbPool::in_memory().unwrap();
    let monday_only = Habit::new(
        OWNER,
        "Gym",
        Frequency::SpecificDays,
        [2].into_iter().collect(),
        1,
        at(2025, 12, 1, 8),
    )
    .unwrap();
    let habit = HabitLogic::add(&mut pool, monday_only, None).unwrap();

    let sunday = key("2025-12-07");
    let res = TrackLogic::mark_done(&mut pool, OWNER, &habit, sunday, &utc(), true, at(2025, 12, 7, 9));
    assert!(matches!(res, Err(AppError::InvalidInput(_))));
}

#[test]
fn test_note_creates_log_and_can_be_cleared() {
    let (mut pool, habits) = pool_with(&["Journal"]);
    let day = key("2025-12-07");

    let saved = TrackLogic::set_note(
        &mut pool,
        OWNER,
        &habits[0],
        day,
        Some("felt great".into()),
        at(2025, 12, 7, 21),
    )
    .unwrap();
    assert_eq!(saved.completed_count, 0);
    assert_eq!(saved.note.as_deref(), Some("felt great"));

    let cleared =
        TrackLogic::set_note(&mut pool, OWNER, &habits[0], day, None, at(2025, 12, 7, 22)).unwrap();
    assert_eq!(cleared.note, None);
    assert_eq!(pool.fetch_logs(OWNER, None, day).unwrap().len(), 1);
}

#[test]
fn test_habit_detail_streaks_and_window() {
    let (mut pool, habits) = pool_with(&["Run"]);
    let id = habits[0].id.clone().unwrap();
    for d in ["2025-11-01", "2025-12-04", "2025-12-05", "2025-12-06", "2025-12-07"] {
        pool.upsert_log(&log(&id, d, 1, 1)).unwrap();
    }
    pool.upsert_log(&log(&id, "2025-12-03", 0, 1)).unwrap();

    let detail = StatsLogic::habit_detail(&mut pool, OWNER, &habits[0], key("2025-12-07"), 14).unwrap();
    assert_eq!(detail.logs.len(), 5);
    assert_eq!(detail.logs[0].date_key, "2025-12-03");
    assert_eq!(detail.streaks.current, 4);
    assert_eq!(detail.streaks.longest, 4);
    assert!((detail.recent_completion_rate - 0.8).abs() < 1e-9);
}

#[test]
fn test_stats_over_store() {
    let (mut pool, habits) = pool_with(&["A", "B"]);
    let a = habits[0].id.clone().unwrap();
    for d in ["2025-12-06", "2025-12-07"] {
        pool.upsert_log(&log(&a, d, 1, 1)).unwrap();
    }

    let stored = pool.fetch_habits(OWNER).unwrap();
    let out = StatsLogic::summary(&mut pool, OWNER, &stored, key("2025-12-07"), &utc(), 2);
    assert!(out.is_complete());
    assert_eq!(out.value.scheduled_slots, 4);
    assert_eq!(out.value.completed_slots, 2);
    assert_eq!(out.value.best_habit_name.as_deref(), Some("A"));
}

// ---------------------------------------------------------------------------
// Degraded results
// ---------------------------------------------------------------------------

#[test]
fn test_stats_degrade_to_partial_summary() {
    let habits = vec![every_day("a", "A", 1, 0), every_day("b", "B", 1, 1)];
    let mut store = FlakyStore::new(habits.clone());
    store.fail_logs = true;

    let out = StatsLogic::summary(&mut store, OWNER, &habits, key("2025-12-07"), &utc(), 7);
    assert!(matches!(out.error, Some(AppError::SourceUnavailable(_))));
    assert_eq!(out.value.total_habits, 2);
    assert_eq!(out.value.active_habits, 2);
    assert_eq!(out.value.completion_rate, 0.0);
    assert_eq!(out.value.best_habit_id, None);
}

#[test]
fn test_today_failure_is_not_an_empty_day() {
    let mut store = FlakyStore::new(vec![every_day("a", "A", 1, 0)]);
    store.fail_habits = true;

    let out = TrackLogic::today(&mut store, OWNER, key("2025-12-07"), &utc());
    assert!(out.value.items.is_empty());
    assert!(matches!(out.error, Some(AppError::SourceUnavailable(_))));

    store.fail_habits = false;
    store.fail_logs = true;
    let out = TrackLogic::today(&mut store, OWNER, key("2025-12-07"), &utc());
    assert!(out.value.items.is_empty());
    assert!(!out.is_complete());
}

#[test]
fn test_fake_store_tracks_like_sqlite() {
    let habit = every_day("a", "A", 1, 0);
    let mut store = FlakyStore::new(vec![habit.clone()]);
    let day = key("2025-12-07");

    TrackLogic::mark_done(&mut store, OWNER, &habit, day, &utc(), true, at(2025, 12, 7, 9)).unwrap();
    let out = TrackLogic::today(&mut store, OWNER, day, &utc());
    assert!(out.is_complete());
    assert_eq!(out.value.completed(), 1);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn test_export_json_and_csv() {
    let (mut pool, habits) = pool_with(&["Read"]);
    let id = habits[0].id.clone().unwrap();
    pool.upsert_log(&log(&id, "2025-12-06", 1, 1)).unwrap();
    let mut noted = log(&id, "2025-12-07", 0, 1);
    noted.note = Some("tired, skipped".into());
    pool.upsert_log(&noted).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("out.json");
    let rows = ExportLogic::export(
        &mut pool,
        OWNER,
        ExportFormat::Json,
        &json_path.to_string_lossy(),
        None,
        false,
    )
    .unwrap();
    assert_eq!(rows, 2);

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    assert_eq!(parsed[0]["habit_name"], "Read");

    let csv_path = dir.path().join("out.csv");
    let rows = ExportLogic::export(
        &mut pool,
        OWNER,
        ExportFormat::Csv,
        &csv_path.to_string_lossy(),
        Some(key("2025-12-07")),
        false,
    )
    .unwrap();
    assert_eq!(rows, 1);
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.lines().next().unwrap().contains("habit_id"));
    assert!(text.contains("\"tired, skipped\""));
}

#[test]
fn test_export_requires_absolute_path() {
    let mut pool = DbPool::in_memory().unwrap();
    let res = ExportLogic::export(&mut pool, OWNER, ExportFormat::Csv, "out.csv", None, true);
    assert!(matches!(res, Err(AppError::Export(_))));
}
