//! Helpers for paths typed by the user.

use std::path::PathBuf;

/// Replace a leading `~` (alone or followed by a separator) with the home
/// directory. Other inputs are returned unchanged.
pub fn expand_tilde(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(raw),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

/// Expanded form of `raw`, or `None` when it is still relative.
pub fn absolute_target(raw: &str) -> Option<PathBuf> {
    Some(expand_tilde(raw)).filter(|p| p.is_absolute())
}
