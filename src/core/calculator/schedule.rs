use crate::core::calendar::{Calendar, DateKey};
use crate::models::{Frequency, Habit};

pub struct ScheduleEvaluator;

impl ScheduleEvaluator {
    /// Whether `habit` should be acted on during `day`.
    pub fn is_due(habit: &Habit, day: &DateKey, calendar: &Calendar) -> bool {
        if habit.is_archived {
            return false;
        }

        match habit.frequency {
            Frequency::EveryDay => true,
            Frequency::SpecificDays => habit
                .days_of_week
                .contains(&calendar.weekday_number(day)),
        }
    }

    /// Human readable recurrence, e.g. "Every Day" or "Mon, Wed, Fri".
    pub fn schedule_description(habit: &Habit, calendar: &Calendar) -> String {
        match habit.frequency {
            Frequency::EveryDay => "Every Day".to_string(),
            Frequency::SpecificDays => {
                if habit.days_of_week.is_empty() {
                    return "No days selected".to_string();
                }
                habit
                    .days_of_week
                    .iter()
                    .filter_map(|n| calendar.short_weekday_name(*n))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    }
}
