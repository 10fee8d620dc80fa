//! New content computed for one generated file.

use std::path::PathBuf;

/// Result of an updater: the file it targets, its full new content and
/// whether that content differs from what is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub content: String,
    pub changed: bool,
}

impl FileUpdate {
    /// Compare `content` against the `current` file content. A file that
    /// does not exist yet (`None`) is always changed.
    pub fn new(path: impl Into<PathBuf>, current: Option<&str>, content: String) -> Self {
        let changed = current != Some(content.as_str());
        Self {
            path: path.into(),
            content,
            changed,
        }
    }
}
