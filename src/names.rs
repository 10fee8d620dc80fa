//! Binary name resolution and discovery.
//!
//! The resolved list is the single input shared by every updater: sorted
//! lexicographically, free of duplicates and free of excluded names, so that
//! the generated files diff minimally between runs.

use std::collections::BTreeSet;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Resolve raw names into the sorted, de-duplicated build list.
///
/// Empty strings and names contained in `excluded` are dropped. Never fails;
/// an empty input yields an empty list.
pub fn resolve_names<I, S>(raw: I, excluded: &BTreeSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let resolved: BTreeSet<String> = raw
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            if name.is_empty() {
                return None;
            }
            if excluded.contains(name) {
                debug!("Skipping excluded name '{}'", name);
                return None;
            }
            Some(name.to_string())
        })
        .collect();

    resolved.into_iter().collect()
}

/// List the immediate sub-directories of `cmd_dir`, one per binary.
///
/// Hidden directories are skipped. The result is unsorted and unfiltered;
/// pass it through [`resolve_names`].
pub fn discover_names(cmd_dir: &Path) -> Result<Vec<String>> {
    if !cmd_dir.is_dir() {
        return Err(Error::Discovery {
            path: cmd_dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(cmd_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Discovery {
            path: cmd_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        names.push(name.into_owned());
    }

    debug!("Discovered {} binaries in {}", names.len(), cmd_dir.display());
    Ok(names)
}
