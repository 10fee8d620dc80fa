//! # Output Configuration
//!
//! This module renders the per-file change summary printed after a run and
//! decides whether that summary may use emoji, based on terminal
//! capabilities and user preferences.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables decoration when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables decoration
//! - `CLICOLOR_FORCE=1` - Forces decoration even in non-TTY
//! - `TERM=dumb` - Disables decoration for dumb terminals

use std::env;
use std::fmt::Write as _;
use std::path::Path;

use crate::sync::{FileChange, Mode, SyncReport, Target};

/// Output configuration for controlling emoji decoration.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` forces decoration on (overriding `NO_COLOR`),
    /// `--color=never` forces it off, anything else detects support from the
    /// environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even if empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Configuration with decoration always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Configuration with decoration always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when decoration is enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Render the human-readable summary of a run.
///
/// Paths are shown relative to `root` when possible.
pub fn render_report(report: &SyncReport, root: &Path, config: &OutputConfig) -> String {
    let mut out = String::new();

    if report.mode != Mode::Write {
        let _ = writeln!(
            out,
            "{} Dry run, no files were written",
            emoji(config, "🔎", "[DRY RUN]")
        );
    }

    for change in &report.changes {
        render_change(&mut out, change, report.mode, root, config);
    }

    out
}

fn render_change(
    out: &mut String,
    change: &FileChange,
    mode: Mode,
    root: &Path,
    config: &OutputConfig,
) {
    let display = change
        .path
        .strip_prefix(root)
        .unwrap_or(&change.path)
        .display();
    let writes = mode == Mode::Write;

    if !change.changed {
        let _ = writeln!(out, "{} {} already up-to-date", emoji(config, "✅", "[OK]"), display);
        return;
    }

    match change.target {
        Target::IgnoreList => {
            let verb = if writes { "Added" } else { "Would add" };
            for pattern in &change.added {
                let _ = writeln!(out, "   {} {} to {}", verb, pattern, display);
            }
            let status = if writes { "updated" } else { "would be updated" };
            let _ = writeln!(out, "{} {} {}", emoji(config, "📝", "[UPDATE]"), display, status);
        }
        Target::Manifest => {
            let status = if writes { "updated" } else { "would be updated" };
            let _ = writeln!(out, "{} {} {}", emoji(config, "📝", "[UPDATE]"), display, status);
        }
        Target::BuildFile => {
            let status = if writes { "regenerated" } else { "would be regenerated" };
            let _ = writeln!(out, "{} {} {}", emoji(config, "🔄", "[REGEN]"), display, status);
        }
    }
}
