//! Terminal UI: entry headers, separators and the `set` spinner.
//!
//! Rendering functions return plain `String`s so the `get` flow decides where
//! they go (pager, stdout or a test buffer).  Styling goes through `console`,
//! which drops the escape codes by itself when colours are disabled.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use console::{Alignment, Term, pad_str, style};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Braille spinner frames, the same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

// ─── Layout ───────────────────────────────────────────────────────────────────

/// Columns available on stdout, or [`DEFAULT_TERMINAL_WIDTH`].
pub fn terminal_width() -> usize {
    match Term::stdout().size_checked() {
        Some((_rows, cols)) if cols > 0 => usize::from(cols),
        _ => {
            warn!(
                width = DEFAULT_TERMINAL_WIDTH,
                "unable to get terminal size, using default"
            );
            DEFAULT_TERMINAL_WIDTH
        },
    }
}

/// A full-width rule followed by a newline.
pub fn separator(width: usize) -> String {
    format!("{}\n", "-".repeat(width))
}

// ─── Entry header ─────────────────────────────────────────────────────────────

/// Format `mtime` in UTC or the local zone.
pub fn format_mtime(mtime: DateTime<Utc>, utc: bool) -> String {
    if utc {
        mtime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        mtime
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    }
}

/// Two-row key/value table shown above each entry in `get --all`, followed
/// by a blank line.
///
/// ```text
/// user   alice
/// mtime  2024-03-01 09:30:00 UTC
/// ```
pub fn render_header(user: &str, mtime: DateTime<Utc>, utc: bool) -> String {
    let rows = [
        ("user", style(user.to_string()).white().bright().underlined()),
        ("mtime", style(format_mtime(mtime, utc))),
    ];
    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (key, value) in &rows {
        let key = style(*key).white().bright().bold().to_string();
        let padded = pad_str(&key, key_width, Alignment::Left, None);
        out.push_str(&format!("{padded}  {value}\n"));
    }
    out.push('\n');
    out
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Create and start an indeterminate spinner for `label` on stderr.
///
/// indicatif keeps it hidden when stderr is not a terminal.
pub fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("  {spinner:.cyan}  {msg}") {
        pb.set_style(spinner_style.tick_chars(SPINNER_CHARS));
    }
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Tests ────────────────────────────────────────────────────────────────────
