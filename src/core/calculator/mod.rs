//! Pure habit engine: schedules, streaks, stats and today's list.
//! Nothing in here performs I/O or reads the clock.

pub mod schedule;
pub mod stats;
pub mod streak;
pub mod today;

pub use schedule::ScheduleEvaluator;
pub use stats::StatsAggregator;
pub use streak::{StreakCalculator, Streaks};
pub use today::{TodayItem, TodayView, TodayViewBuilder};
