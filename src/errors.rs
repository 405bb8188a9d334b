//! Error type shared by the engine, storage, feed and CLI layers.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// The storage collaborator could not deliver habits or logs.
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed date key: {0} (expected YYYY-MM-DD)")]
    MalformedDateKey(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An operation needing a persisted id was called on an unsaved record.
    #[error("Missing identity: {0} has not been persisted yet")]
    MissingIdentity(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Habit name '{0}' matches more than one habit, use the id instead")]
    AmbiguousHabit(String),

    #[error("A live habit feed is already running for '{0}'")]
    FeedBusy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
