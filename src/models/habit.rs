use super::frequency::Frequency;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_EMOJI: &str = "✅";
pub const DEFAULT_COLOR: &str = "#4CAF50";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Assigned by storage; `None` until the habit is first persisted.
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub emoji: String,
    pub color_hex: String,
    pub frequency: Frequency,
    /// Weekday numbers 1..=7, only meaningful for `SpecificDays`.
    pub days_of_week: BTreeSet<u8>,
    pub target_per_day: u32,
    pub is_archived: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// Build a new, not yet persisted habit.
    ///
    /// Fails on an empty name, a zero target or a weekday outside 1..=7.
    pub fn new(
        owner_id: &str,
        name: &str,
        frequency: Frequency,
        days_of_week: BTreeSet<u8>,
        target_per_day: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let habit = Self {
            id: None,
            owner_id: owner_id.to_string(),
            name: name.trim().to_string(),
            description: None,
            emoji: DEFAULT_EMOJI.to_string(),
            color_hex: DEFAULT_COLOR.to_string(),
            frequency,
            days_of_week,
            target_per_day,
            is_archived: false,
            sort_order: 0,
            created_at: now,
            updated_at: None,
        };
        habit.validate()?;
        Ok(habit)
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_emoji(mut self, emoji: &str) -> Self {
        self.emoji = emoji.to_string();
        self
    }

    pub fn with_color(mut self, color_hex: &str) -> Self {
        self.color_hex = color_hex.to_string();
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.is_empty() {
            return Err(AppError::InvalidInput("habit name cannot be empty".into()));
        }
        if self.owner_id.is_empty() {
            return Err(AppError::InvalidInput("habit owner cannot be empty".into()));
        }
        if self.target_per_day == 0 {
            return Err(AppError::InvalidInput(
                "target per day must be at least 1".into(),
            ));
        }
        if let Some(bad) = self.days_of_week.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(AppError::InvalidInput(format!(
                "weekday {bad} is outside 1..7"
            )));
        }
        Ok(())
    }

    /// The storage id, or `MissingIdentity` for an unsaved habit.
    pub fn persisted_id(&self) -> AppResult<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| AppError::MissingIdentity(format!("habit '{}'", self.name)))
    }
}
