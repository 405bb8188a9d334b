pub mod calculator;
pub mod calendar;
pub mod config;
pub mod habits;
pub mod insights;
pub mod log;
pub mod tracking;

use crate::errors::AppError;

/// A computed value plus the failure that degraded it, if any.
///
/// Used where a partial answer is still worth showing (habit counts without
/// stats) or where an empty answer must not be mistaken for "nothing to do".
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub error: Option<AppError>,
}

impl<T> Outcome<T> {
    pub fn complete(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn degraded(value: T, error: AppError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}
