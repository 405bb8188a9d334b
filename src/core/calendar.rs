//! Calendar-day keys and the calendar they are resolved against.
//!
//! Every other part of the engine works on [`DateKey`], never on raw
//! timestamps, so that "same day" means the same thing everywhere.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A normalized civil day, stored and exchanged as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Resolve a timestamp to its calendar day.
    pub fn normalize(timestamp: DateTime<Utc>, calendar: &Calendar) -> Self {
        let local = match calendar.utc_offset {
            Some(offset) => timestamp.with_timezone(&offset).naive_local(),
            None => timestamp.with_timezone(&Local).naive_local(),
        };
        let shifted = local - Duration::hours(i64::from(calendar.day_start_hour));
        Self(shifted.date())
    }

    /// Strict `YYYY-MM-DD`: zero-padded, no surrounding whitespace, so the
    /// text order of stored keys matches date order.
    pub fn parse(s: &str) -> AppResult<Self> {
        let malformed = || AppError::MalformedDateKey(s.to_string());
        if s.len() != 10 {
            return Err(malformed());
        }
        let key = NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map(Self)
            .map_err(|_| malformed())?;
        if key.to_string() != s {
            return Err(malformed());
        }
        Ok(key)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `None` only when the result leaves chrono's supported range.
    pub fn add_days(&self, n: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(n)).map(Self)
    }

    pub fn next(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn previous(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Signed number of days from `self` to `other` (positive when `other` is later).
    pub fn days_until(&self, other: &DateKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    pub fn is_adjacent_to(&self, other: &DateKey) -> bool {
        self.days_until(other).abs() == 1
    }

    /// The `days` calendar days ending at `self`, oldest first.
    pub fn window_ending(&self, days: u32) -> Vec<DateKey> {
        (0..i64::from(days))
            .rev()
            .filter_map(|offset| self.add_days(-offset))
            .collect()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DateKey::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Day boundary and week convention used to resolve timestamps into days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    /// Weekday numbered 1 in `daysOfWeek`.
    pub first_weekday: Weekday,
    /// Hour (0..=23) at which a new day starts.
    pub day_start_hour: u32,
    /// Fixed zone; `None` resolves against the system local zone.
    pub utc_offset: Option<FixedOffset>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            first_weekday: Weekday::Sun,
            day_start_hour: 0,
            utc_offset: None,
        }
    }
}

impl Calendar {
    /// Calendar pinned to a fixed offset, Sunday-first, midnight boundary.
    pub fn fixed(offset: FixedOffset) -> Self {
        Self {
            utc_offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn with_first_weekday(mut self, first: Weekday) -> Self {
        self.first_weekday = first;
        self
    }

    pub fn with_day_start_hour(mut self, hour: u32) -> Self {
        self.day_start_hour = hour.min(23);
        self
    }

    pub fn today(&self, now: DateTime<Utc>) -> DateKey {
        DateKey::normalize(now, self)
    }

    /// Weekday number 1..=7, counted from `first_weekday`.
    pub fn weekday_number(&self, key: &DateKey) -> u8 {
        let day = key.0.weekday().num_days_from_monday();
        let first = self.first_weekday.num_days_from_monday();
        ((day + 7 - first) % 7 + 1) as u8
    }

    pub fn weekday_of(&self, number: u8) -> Option<Weekday> {
        if !(1..=7).contains(&number) {
            return None;
        }
        let mut day = self.first_weekday;
        for _ in 1..number {
            day = day.succ();
        }
        Some(day)
    }

    pub fn short_weekday_name(&self, number: u8) -> Option<String> {
        self.weekday_of(number).map(|d| d.to_string())
    }
}
