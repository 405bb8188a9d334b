use serde::{Deserialize, Serialize};

/// Recurrence rule of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    EveryDay,
    SpecificDays,
}

impl Frequency {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Frequency::EveryDay => "everyDay",
            Frequency::SpecificDays => "specificDays",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "everyDay" => Some(Frequency::EveryDay),
            "specificDays" => Some(Frequency::SpecificDays),
            _ => None,
        }
    }
}
