use serde::Serialize;

/// Aggregate view over the trailing stats window. Recomputed on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_habits: usize,
    pub active_habits: usize,
    pub window_days: u32,
    pub scheduled_slots: usize,
    pub completed_slots: usize,
    /// completed / scheduled slots, 0 when nothing was scheduled.
    pub completion_rate: f64,
    pub best_habit_id: Option<String>,
    pub best_habit_name: Option<String>,
    pub total_completions: u64,
}
