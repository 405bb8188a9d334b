//! Fixed-width text tables for terminal output.
//! Widths are measured in terminal columns so emoji and colored cells
//! still line up.

use crate::utils::colors::strip_ansi;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Row that only fills column `index`, used for wrapped text.
    pub fn add_continuation(&mut self, index: usize, text: &str) {
        let mut row = vec![String::new(); self.columns.len()];
        if let Some(cell) = row.get_mut(index) {
            *cell = text.to_string();
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();

        for cells in std::iter::once(headers).chain(
            self.rows
                .iter()
                .map(|r| r.iter().map(String::as_str).collect()),
        ) {
            for (i, col) in self.columns.iter().enumerate() {
                let cell = cells.get(i).copied().unwrap_or("");
                let visible = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                let _ = write!(out, "{cell}{:fill$} ", "", fill = col.width.saturating_sub(visible));
            }
            // no trailing blanks
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }

        out
    }
}
