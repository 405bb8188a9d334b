#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, TimeZone, Utc};
use habitflow::core::calendar::DateKey;
use habitflow::models::{Frequency, Habit, HabitLog};
use std::collections::BTreeSet;
use tempfile::TempDir;

pub const OWNER: &str = "tester";

pub fn hf() -> Command {
    cargo_bin_cmd!("habitflow")
}

/// Scratch directory plus the path of a database inside it.
/// Keep the `TempDir` alive for as long as the database is used.
pub fn setup_test_db() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db = dir.path().join("habitflow.sqlite");
    (dir, db.to_string_lossy().to_string())
}

/// `habitflow --db <db> --user tester <args…>`
pub fn hf_db(db: &str, args: &[&str]) -> Command {
    let mut cmd = hf();
    cmd.args(["--db", db, "--user", OWNER]).args(args);
    cmd
}

pub fn key(s: &str) -> DateKey {
    DateKey::parse(s).expect("valid date key")
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// A persisted-looking every-day habit.
pub fn every_day(id: &str, name: &str, target: u32, order: i32) -> Habit {
    let mut h = Habit::new(
        OWNER,
        name,
        Frequency::EveryDay,
        BTreeSet::new(),
        target,
        at(2025, 1, 1, 8),
    )
    .expect("valid habit")
    .with_sort_order(order);
    h.id = Some(id.to_string());
    h
}

pub fn on_days(id: &str, name: &str, days: &[u8]) -> Habit {
    let mut h = Habit::new(
        OWNER,
        name,
        Frequency::SpecificDays,
        days.iter().copied().collect(),
        1,
        at(2025, 1, 1, 8),
    )
    .expect("valid habit");
    h.id = Some(id.to_string());
    h
}

pub fn log(habit_id: &str, date: &str, count: u32, target: u32) -> HabitLog {
    HabitLog {
        habit_id: habit_id.to_string(),
        owner_id: OWNER.to_string(),
        date_key: date.to_string(),
        completed_count: count,
        target_per_day: target,
        note: None,
        created_at: at(2025, 1, 1, 8),
        updated_at: None,
    }
}
