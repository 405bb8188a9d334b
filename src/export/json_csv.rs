// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, LogExport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Serialize `rows` into `path` in the requested format.
pub(crate) fn write_rows(format: ExportFormat, rows: &[LogExport], path: &Path) -> AppResult<()> {
    debug!(format = format.as_str(), rows = rows.len(), path = %path.display(), "writing export");
    match format {
        ExportFormat::Csv => write_csv(rows, path),
        ExportFormat::Json => write_json(rows, path),
    }
}

fn write_json(rows: &[LogExport], path: &Path) -> AppResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

// header row comes from the serde field names
fn write_csv(rows: &[LogExport], path: &Path) -> AppResult<()> {
    let csv_err = |e: csv::Error| AppError::Export(format!("CSV error: {e}"));

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush()?;
    Ok(())
}
