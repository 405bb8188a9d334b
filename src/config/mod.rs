use crate::core::calculator::stats::DEFAULT_WINDOW_DAYS;
use crate::core::calendar::Calendar;
use crate::errors::{AppError, AppResult};
use chrono::{FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Weekday numbered 1 in habit schedules.
    #[serde(default = "default_first_weekday")]
    pub first_weekday: Weekday,
    /// Hour (0..23) at which a new habit day begins.
    #[serde(default)]
    pub day_start_hour: u32,
    /// Fixed UTC offset in minutes; absent means the system time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    #[serde(default = "default_stats_window")]
    pub stats_window_days: u32,
    #[serde(default = "default_detail_window")]
    pub detail_window_days: u32,
    #[serde(default = "default_clamp")]
    pub clamp_to_target: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_owner() -> String {
    "local".to_string()
}
fn default_first_weekday() -> Weekday {
    Weekday::Sun
}
fn default_stats_window() -> u32 {
    DEFAULT_WINDOW_DAYS
}
fn default_detail_window() -> u32 {
    14
}
fn default_clamp() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            owner: default_owner(),
            first_weekday: default_first_weekday(),
            day_start_hour: 0,
            utc_offset_minutes: None,
            stats_window_days: default_stats_window(),
            detail_window_days: default_detail_window(),
            clamp_to_target: default_clamp(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("habitflow")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".habitflow")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("habitflow.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("habitflow.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.day_start_hour > 23 {
            return Err(AppError::Config(format!(
                "day_start_hour must be between 0 and 23, got {}",
                self.day_start_hour
            )));
        }
        if self.stats_window_days == 0 || self.detail_window_days == 0 {
            return Err(AppError::Config("window sizes must be at least 1 day".into()));
        }
        if self.owner.trim().is_empty() {
            return Err(AppError::Config("owner cannot be empty".into()));
        }
        Ok(())
    }

    /// Calendar used to turn timestamps into habit days.
    pub fn calendar(&self) -> AppResult<Calendar> {
        let utc_offset = match self.utc_offset_minutes {
            Some(minutes) => Some(
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        AppError::Config(format!("utc_offset_minutes out of range: {minutes}"))
                    })?,
            ),
            None => None,
        };

        Ok(Calendar {
            first_weekday: self.first_weekday,
            day_start_hour: self.day_start_hour,
            utc_offset,
        })
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Initialize configuration and database files, returning the DB path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("habitflow.sqlite")
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(config.to_yaml()?.as_bytes())?;
        }

        Ok(db_path)
    }
}
