pub mod frequency;
pub mod habit;
pub mod habit_log;
pub mod stats_summary;

pub use frequency::Frequency;
pub use habit::Habit;
pub use habit_log::HabitLog;
pub use stats_summary::StatsSummary;
