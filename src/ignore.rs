//! Ignore list updates
//!
//! `go build ./cmd/<name>` leaves a binary at `cmd/<name>/<name>`. Each such
//! path is added to the ignore list once, preceded by a comment naming the
//! generator. The list only ever grows: existing lines are never rewritten,
//! reordered or removed.

use log::{debug, warn};

use crate::settings::{Settings, GENERATOR};
use crate::update::FileUpdate;

/// New ignore list content, plus the appended text and patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreUpdate {
    /// Full new content: the current content followed by `appendix`.
    pub file: FileUpdate,
    /// Patterns that were missing, in the order they are appended.
    pub added: Vec<String>,
    /// Exact text to append to the file. Empty when nothing was added.
    pub appendix: String,
}

impl IgnoreUpdate {
    /// Whether the file needs to change.
    pub fn is_changed(&self) -> bool {
        self.file.changed
    }
}

/// Comment line written before every appended pattern.
pub fn comment_line() -> String {
    format!("# Auto-added by {} to ignore ad-hoc Go binaries", GENERATOR)
}

/// Compute what must be appended to `current` so that every binary output
/// path for `names` is ignored.
///
/// A pattern counts as present if it occurs anywhere in `current`, as a
/// plain substring.
pub fn update(current: &str, names: &[String], settings: &Settings) -> IgnoreUpdate {
    let mut added: Vec<String> = Vec::new();
    let mut appendix = String::new();

    for name in names {
        let pattern = settings.binary_output_path(name);
        if current.contains(&pattern) || added.contains(&pattern) {
            debug!("'{}' already ignored", pattern);
            continue;
        }

        if appendix.is_empty() && !current.is_empty() && !current.ends_with('\n') {
            warn!(
                "{} does not end with a newline, adding one before new entries",
                settings.paths.ignore_file.display()
            );
            appendix.push('\n');
        }

        appendix.push_str(&comment_line());
        appendix.push('\n');
        appendix.push_str(&pattern);
        appendix.push('\n');
        added.push(pattern);
    }

    let content = format!("{}{}", current, appendix);
    IgnoreUpdate {
        file: FileUpdate::new(settings.ignore_path(), Some(current), content),
        added,
        appendix,
    }
}
