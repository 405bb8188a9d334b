use chrono::{FixedOffset, Weekday};
use habitflow::core::calculator::{
    ScheduleEvaluator, StatsAggregator, StreakCalculator, Streaks, TodayItem, TodayViewBuilder,
};
use habitflow::config::Config;
use habitflow::core::calendar::{Calendar, DateKey};
use habitflow::errors::AppError;

mod common;
use common::{OWNER, at, every_day, key, log, on_days};

fn utc() -> Calendar {
    Calendar::fixed(FixedOffset::east_opt(0).unwrap())
}

// ---------------------------------------------------------------------------
// DateKey / Calendar
// ---------------------------------------------------------------------------

#[test]
fn test_date_key_text_round_trip() {
    let k = key("2025-12-07");
    assert_eq!(k.to_string(), "2025-12-07");
    assert_eq!("2025-12-07".parse::<DateKey>().unwrap(), k);

    let json = serde_json::to_string(&k).unwrap();
    assert_eq!(json, "\"2025-12-07\"");
    assert_eq!(serde_json::from_str::<DateKey>(&json).unwrap(), k);
}

#[test]
fn test_date_key_rejects_malformed_text() {
    for bad in [
        "2025-13-01",
        "07/12/2025",
        "",
        "2025-02-30",
        "2025-1-5",
        "2025-01-5",
        " 2025-01-05",
        "2025-01-05 ",
        "2025-01-05T00:00",
    ] {
        assert!(matches!(
            DateKey::parse(bad),
            Err(AppError::MalformedDateKey(_))
        ));
    }
}

#[test]
fn test_config_offset_out_of_range_is_a_config_error() {
    for minutes in [40_000_000, i32::MIN, 24 * 60] {
        let cfg = Config {
            utc_offset_minutes: Some(minutes),
            ..Config::default()
        };
        assert!(matches!(cfg.calendar(), Err(AppError::Config(_))));
    }

    let cfg = Config {
        utc_offset_minutes: Some(-300),
        ..Config::default()
    };
    let calendar = cfg.calendar().unwrap();
    assert_eq!(calendar.utc_offset, FixedOffset::west_opt(5 * 3600));
}

#[test]
fn test_date_key_arithmetic() {
    let k = key("2025-12-31");
    assert_eq!(k.next().unwrap(), key("2026-01-01"));
    assert_eq!(k.previous().unwrap(), key("2025-12-30"));
    assert_eq!(k.add_days(-30).unwrap(), key("2025-12-01"));
    assert_eq!(key("2025-12-01").days_until(&k), 30);
    assert_eq!(k.days_until(&key("2025-12-01")), -30);
    assert!(k.is_adjacent_to(&key("2026-01-01")));
    assert!(!k.is_adjacent_to(&key("2026-01-02")));

    let window = key("2025-12-07").window_ending(3);
    assert_eq!(
        window,
        vec![key("2025-12-05"), key("2025-12-06"), key("2025-12-07")]
    );
}

#[test]
fn test_normalize_uses_offset_and_day_start() {
    // 23:30 UTC is already the next day two hours east
    let cal = Calendar::fixed(FixedOffset::east_opt(2 * 3600).unwrap());
    let ts = at(2025, 12, 6, 23) + chrono::Duration::minutes(30);
    assert_eq!(DateKey::normalize(ts, &cal), key("2025-12-07"));

    // with a 04:00 day start, 02:00 still belongs to the previous day
    let late = utc().with_day_start_hour(4);
    assert_eq!(late.today(at(2025, 12, 7, 2)), key("2025-12-06"));
    assert_eq!(late.today(at(2025, 12, 7, 5)), key("2025-12-07"));
}

#[test]
fn test_weekday_numbering_follows_first_weekday() {
    let sunday_first = Calendar::default();
    assert_eq!(sunday_first.weekday_number(&key("2025-12-07")), 1); // Sun
    assert_eq!(sunday_first.weekday_number(&key("2025-12-01")), 2); // Mon

    let monday_first = Calendar::default().with_first_weekday(Weekday::Mon);
    assert_eq!(monday_first.weekday_number(&key("2025-12-01")), 1);
    assert_eq!(monday_first.weekday_number(&key("2025-12-07")), 7);

    assert_eq!(sunday_first.weekday_of(2), Some(Weekday::Mon));
    assert_eq!(monday_first.short_weekday_name(3).as_deref(), Some("Wed"));
    assert_eq!(sunday_first.weekday_of(0), None);
    assert_eq!(sunday_first.weekday_of(8), None);
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[test]
fn test_every_day_habit_is_always_due() {
    let h = every_day("h1", "Read", 1, 0);
    let cal = utc();
    for day in key("2025-12-07").window_ending(14) {
        assert!(ScheduleEvaluator::is_due(&h, &day, &cal));
    }
}

#[test]
fn test_archived_habit_is_never_due() {
    let mut h = every_day("h1", "Read", 1, 0);
    h.is_archived = true;
    assert!(!ScheduleEvaluator::is_due(&h, &key("2025-12-07"), &utc()));
}

#[test]
fn test_specific_days_due_only_on_selected_weekdays() {
    // 2 = Mon, 4 = Wed, 6 = Fri with Sunday first
    let h = on_days("h1", "Gym", &[2, 4, 6]);
    let cal = utc();
    assert!(ScheduleEvaluator::is_due(&h, &key("2025-12-01"), &cal));
    assert!(ScheduleEvaluator::is_due(&h, &key("2025-12-03"), &cal));
    assert!(ScheduleEvaluator::is_due(&h, &key("2025-12-05"), &cal));
    assert!(!ScheduleEvaluator::is_due(&h, &key("2025-12-02"), &cal));
    assert!(!ScheduleEvaluator::is_due(&h, &key("2025-12-07"), &cal));
}

#[test]
fn test_specific_days_with_empty_set_is_never_due() {
    let h = on_days("h1", "Nothing", &[]);
    let cal = utc();
    for day in key("2025-12-07").window_ending(7) {
        assert!(!ScheduleEvaluator::is_due(&h, &day, &cal));
    }
    assert_eq!(
        ScheduleEvaluator::schedule_description(&h, &cal),
        "No days selected"
    );
}

#[test]
fn test_schedule_description() {
    let cal = utc();
    assert_eq!(
        ScheduleEvaluator::schedule_description(&every_day("a", "A", 1, 0), &cal),
        "Every Day"
    );
    assert_eq!(
        ScheduleEvaluator::schedule_description(&on_days("b", "B", &[6, 2, 4]), &cal),
        "Mon, Wed, Fri"
    );
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

#[test]
fn test_streaks_of_three_consecutive_days() {
    let logs = vec![
        log("h", "2025-12-05", 1, 1),
        log("h", "2025-12-06", 1, 1),
        log("h", "2025-12-07", 1, 1),
    ];
    let s = StreakCalculator::streaks(&logs);
    assert_eq!(s.current, 3);
    assert!(s.longest >= 3);
}

#[test]
fn test_streaks_break_on_missed_day() {
    let logs = vec![
        log("h", "2025-12-04", 1, 1),
        log("h", "2025-12-05", 1, 1),
        log("h", "2025-12-06", 0, 1),
        log("h", "2025-12-07", 1, 1),
    ];
    assert_eq!(
        StreakCalculator::streaks(&logs),
        Streaks {
            current: 1,
            longest: 2
        }
    );
}

#[test]
fn test_streaks_ignore_input_order_and_gaps() {
    // out of order; the gap between 12-02 and 12-05 restarts the run
    let logs = vec![
        log("h", "2025-12-06", 2, 2),
        log("h", "2025-12-01", 2, 2),
        log("h", "2025-12-05", 2, 2),
        log("h", "2025-12-02", 2, 2),
    ];
    let s = StreakCalculator::streaks(&logs);
    assert_eq!(s.current, 2);
    assert_eq!(s.longest, 2);
}

#[test]
fn test_streaks_empty_and_malformed() {
    assert_eq!(StreakCalculator::streaks(&[]), Streaks::default());

    let logs = vec![log("h", "not-a-date", 1, 1), log("h", "2025-12-07", 1, 1)];
    assert_eq!(StreakCalculator::streaks(&logs).current, 1);
}

#[test]
fn test_recent_completion_rate() {
    let logs = vec![
        log("h", "2025-12-01", 0, 1),
        log("h", "2025-12-02", 1, 1),
        log("h", "2025-12-03", 1, 1),
        log("h", "2025-12-04", 0, 1),
    ];
    assert_eq!(StreakCalculator::recent_completion_rate(&logs, 2), 0.5);
    assert_eq!(StreakCalculator::recent_completion_rate(&logs, 10), 0.5);
    assert_eq!(StreakCalculator::recent_completion_rate(&[], 7), 0.0);
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[test]
fn test_stats_rate_is_zero_without_slots() {
    let mut archived = every_day("a", "A", 1, 0);
    archived.is_archived = true;
    let s = StatsAggregator::compute_summary(&[archived], &[], key("2025-12-07"), &utc(), 7);
    assert_eq!(s.total_habits, 1);
    assert_eq!(s.active_habits, 0);
    assert_eq!(s.scheduled_slots, 0);
    assert_eq!(s.completion_rate, 0.0);
    assert_eq!(s.best_habit_id, None);
}

#[test]
fn test_stats_five_slots_three_completed() {
    let h = every_day("h", "Walk", 1, 0);
    let logs = vec![
        log("h", "2025-12-03", 1, 1),
        log("h", "2025-12-05", 1, 1),
        log("h", "2025-12-07", 1, 1),
        log("h", "2025-12-06", 0, 1),
        // outside the window
        log("h", "2025-12-01", 1, 1),
    ];
    let s = StatsAggregator::compute_summary(&[h], &logs, key("2025-12-07"), &utc(), 5);
    assert_eq!(s.scheduled_slots, 5);
    assert_eq!(s.completed_slots, 3);
    assert!((s.completion_rate - 0.6).abs() < f64::EPSILON);
    assert_eq!(s.total_completions, 3);
}

#[test]
fn test_stats_best_habit_tie_goes_to_first_listed() {
    let a = every_day("a", "A", 4, 0);
    let b = every_day("b", "B", 4, 1);
    let logs = vec![log("b", "2025-12-07", 4, 4), log("a", "2025-12-07", 4, 4)];
    let s = StatsAggregator::compute_summary(&[a, b], &logs, key("2025-12-07"), &utc(), 7);
    assert_eq!(s.best_habit_id.as_deref(), Some("a"));
    assert_eq!(s.best_habit_name.as_deref(), Some("A"));
    assert_eq!(s.total_completions, 8);
}

#[test]
fn test_stats_no_best_habit_when_nothing_completed() {
    let h = every_day("h", "Walk", 2, 0);
    let logs = vec![log("h", "2025-12-07", 0, 2)];
    let s = StatsAggregator::compute_summary(&[h], &logs, key("2025-12-07"), &utc(), 7);
    assert_eq!(s.total_completions, 0);
    assert_eq!(s.best_habit_id, None);
    assert_eq!(s.best_habit_name, None);
}

#[test]
fn test_stats_count_only_due_days_of_active_habits() {
    // 2025-12-01 (Mon) .. 2025-12-07 (Sun)
    let gym = on_days("gym", "Gym", &[2, 4]); // Mon, Wed
    let mut old = every_day("old", "Old", 1, 1);
    old.is_archived = true;
    let logs = vec![
        log("gym", "2025-12-01", 1, 1),
        // not a gym day, no slot for it
        log("gym", "2025-12-02", 1, 1),
        log("old", "2025-12-05", 1, 1),
        log("old", "2025-12-06", 1, 1),
    ];

    let s = StatsAggregator::compute_summary(&[gym, old], &logs, key("2025-12-07"), &utc(), 7);
    assert_eq!(s.active_habits, 1);
    assert_eq!(s.scheduled_slots, 2);
    assert_eq!(s.completed_slots, 1);
    assert!((s.completion_rate - 0.5).abs() < f64::EPSILON);
    assert_eq!(s.total_completions, 4);
}

#[test]
fn test_partial_summary_keeps_counts_only() {
    let mut b = every_day("b", "B", 1, 1);
    b.is_archived = true;
    let s = StatsAggregator::partial_summary(&[every_day("a", "A", 1, 0), b], 7);
    assert_eq!(s.total_habits, 2);
    assert_eq!(s.active_habits, 1);
    assert_eq!(s.window_days, 7);
    assert_eq!(s.completion_rate, 0.0);
    assert_eq!(s.scheduled_slots, 0);
}

// ---------------------------------------------------------------------------
// Today
// ---------------------------------------------------------------------------

#[test]
fn test_today_lists_due_habits_in_sort_order() {
    let habits = vec![
        every_day("late", "Late", 1, 5),
        on_days("gym", "Gym", &[2]), // Mondays only
        every_day("early", "Early", 1, 1),
    ];
    let view = TodayViewBuilder::build_today(&habits, &[], key("2025-12-07"), &utc());
    let names: Vec<&str> = view.items.iter().map(|i| i.habit.name.as_str()).collect();
    assert_eq!(names, vec!["Early", "Late"]);
}

#[test]
fn test_today_keeps_input_order_for_equal_sort_order() {
    let habits = vec![
        every_day("b", "B", 1, 0),
        every_day("z", "Z", 1, 1),
        every_day("a", "A", 1, 0),
        every_day("c", "C", 1, 0),
    ];
    let view = TodayViewBuilder::build_today(&habits, &[], key("2025-12-07"), &utc());
    let names: Vec<&str> = view.items.iter().map(|i| i.habit.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C", "Z"]);
}

#[test]
fn test_today_reports_duplicate_logs() {
    let habits = vec![every_day("h", "Water", 3, 0)];
    let logs = vec![
        log("h", "2025-12-07", 2, 3),
        log("h", "2025-12-07", 3, 3),
        log("h", "2025-12-06", 3, 3),
    ];
    let view = TodayViewBuilder::build_today(&habits, &logs, key("2025-12-07"), &utc());
    assert_eq!(view.items[0].completed_count(), 2);
    assert_eq!(view.integrity_issues.len(), 1);
    assert_eq!(view.integrity_issues[0].count, 2);
}

#[test]
fn test_clamped_increment_stays_at_target() {
    let item = TodayItem {
        habit: every_day("h", "Water", 2, 0),
        log: Some(log("h", "2025-12-07", 2, 2)),
    };
    let now = at(2025, 12, 7, 10);
    let next =
        TodayViewBuilder::increment_completion(&item, OWNER, key("2025-12-07"), true, now).unwrap();
    assert_eq!(next.completed_count, 2);
    assert_eq!(next.updated_at, Some(now));

    let unclamped =
        TodayViewBuilder::increment_completion(&item, OWNER, key("2025-12-07"), false, now)
            .unwrap();
    assert_eq!(unclamped.completed_count, 3);
}

#[test]
fn test_increment_requires_persisted_habit() {
    let mut habit = every_day("h", "Water", 1, 0);
    habit.id = None;
    let item = TodayItem { habit, log: None };
    let res = TodayViewBuilder::increment_completion(
        &item,
        OWNER,
        key("2025-12-07"),
        true,
        at(2025, 12, 7, 9),
    );
    assert!(matches!(res, Err(AppError::MissingIdentity(_))));
}

#[test]
fn test_single_habit_completed_after_one_increment() {
    let today = key("2025-12-07");
    let habits = vec![every_day("h", "Meditate", 1, 0)];
    let view = TodayViewBuilder::build_today(&habits, &[], today, &utc());

    assert_eq!(view.items.len(), 1);
    let item = view.items[0].clone();
    assert_eq!(item.completed_count(), 0);
    assert!(!item.is_completed());
    assert_eq!(item.progress_text(), "0/1");

    let new_log =
        TodayViewBuilder::increment_completion(&item, OWNER, today, true, at(2025, 12, 7, 9))
            .unwrap();
    assert_eq!(new_log.date_key, "2025-12-07");
    let item = item.with_log(new_log);
    assert!(item.is_completed());
    assert_eq!(item.progress_text(), "1/1");

    let view = TodayViewBuilder::build_today(&habits, &[item.log.unwrap()], today, &utc());
    assert_eq!(view.completed(), 1);
    assert!(view.item_for("h").is_some_and(|i| i.is_completed()));
}
