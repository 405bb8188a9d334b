// src/export/logic.rs

use crate::core::calendar::DateKey;
use crate::db::store::HabitStore;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::write_rows;
use crate::export::model::LogExport;
use crate::ui::messages::{success, warning};
use crate::utils::path::absolute_target;
use std::collections::HashMap;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the owner's logs dated on or after `since` (all when `None`).
    ///
    /// `file` must be absolute once `~/` is expanded. Returns the number of
    /// rows written.
    pub fn export<S: HabitStore>(
        store: &mut S,
        owner_id: &str,
        format: ExportFormat,
        file: &str,
        since: Option<DateKey>,
        force: bool,
    ) -> AppResult<usize> {
        let path = absolute_target(file).ok_or_else(|| {
            AppError::Export(format!("Output file path must be absolute: {file}"))
        })?;

        ensure_writable(&path, force)?;

        let lower = match since {
            Some(d) => d,
            None => DateKey::from_ymd(1, 1, 1)
                .ok_or_else(|| AppError::Other("invalid lower date bound".into()))?,
        };

        let habits = store.fetch_habits(owner_id)?;
        let by_id: HashMap<&str, _> = habits
            .iter()
            .filter_map(|h| h.id.as_deref().map(|id| (id, h)))
            .collect();

        let rows: Vec<LogExport> = store
            .fetch_logs(owner_id, None, lower)?
            .iter()
            .filter(|l| l.date().is_ok_and(|d| d >= lower))
            .map(|l| LogExport::from_log(l, by_id.get(l.habit_id.as_str()).copied()))
            .collect();

        if rows.is_empty() {
            warning("No logs found for the selected range.");
            return Ok(0);
        }

        write_rows(format, &rows, &path)?;
        success(format!(
            "{} export completed: {} ({} rows)",
            format.as_str().to_uppercase(),
            path.display(),
            rows.len()
        ));

        store.audit(
            "export",
            format.as_str(),
            &format!("Exported {} logs to {}", rows.len(), path.display()),
        )?;

        Ok(rows.len())
    }
}
