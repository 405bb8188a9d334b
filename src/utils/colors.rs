//! ANSI color helper utilities for terminal output.
use regex::Regex;
use std::sync::LazyLock;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Completion rate color:
/// ≥ 80% → green
/// ≥ 50% → yellow
/// below → red
pub fn color_for_rate(rate: f64) -> &'static str {
    if rate >= 0.8 {
        GREEN
    } else if rate >= 0.5 {
        YELLOW
    } else {
        RED
    }
}

/// Green when done, grey when nothing logged yet, plain otherwise.
pub fn colorize_progress(text: &str, completed: bool, count: u32) -> String {
    if completed {
        format!("{GREEN}{text}{RESET}")
    } else if count == 0 {
        format!("{GREY}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Returns formatted grey text for an empty optional value.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}

static ANSI_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

/// Remove ANSI escape sequences, leaving the visible text.
pub fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}
