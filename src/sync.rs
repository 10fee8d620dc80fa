//! Run orchestration
//!
//! A run updates three files in a fixed order, each through a pure transform
//! from current content to new content:
//!
//! 1.  **Manifest**: `builds` (and `dockers_v2`) rewritten, other keys kept.
//! 2.  **Ignore list**: missing binary paths appended.
//! 3.  **Build file**: regenerated from its template.
//!
//! The first failure aborts the run. Files written before the failure stay
//! written; there is no rollback.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::{buildfile, ignore, manifest};

/// Whether a run writes its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Write every changed file.
    #[default]
    Write,
    /// Compute changes and report them without writing.
    DryRun,
    /// Like `DryRun`; callers treat any pending change as a failure.
    Check,
}

impl Mode {
    fn writes(self) -> bool {
        self == Mode::Write
    }
}

/// Which generated file a [`FileChange`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Manifest,
    IgnoreList,
    BuildFile,
}

/// Outcome of one updater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub target: Target,
    pub path: PathBuf,
    /// Whether the file content differs (or would differ) after the run.
    pub changed: bool,
    /// Ignore patterns appended; empty for the other targets.
    pub added: Vec<String>,
}

/// Per-file outcomes of a run, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub mode: Mode,
    pub names: Vec<String>,
    pub changes: Vec<FileChange>,
}

impl SyncReport {
    /// Whether any file changed (or would change).
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|c| c.changed)
    }
}

/// Run every updater for the already-resolved `names`.
pub fn run(settings: &Settings, names: &[String], mode: Mode) -> Result<SyncReport> {
    info!("Updating configs for {} binaries ({:?})", names.len(), mode);

    let changes = vec![
        sync_manifest(settings, names, mode)?,
        sync_ignore_list(settings, names, mode)?,
        sync_build_file(settings, names, mode)?,
    ];

    Ok(SyncReport {
        mode,
        names: names.to_vec(),
        changes,
    })
}

/// Rewrite the release manifest.
pub fn sync_manifest(settings: &Settings, names: &[String], mode: Mode) -> Result<FileChange> {
    let current = read_required(&settings.manifest_path())?;
    let update = manifest::update(&current, names, settings)?;

    if update.changed && mode.writes() {
        write_file(&update.path, &update.content)?;
    }

    Ok(FileChange {
        target: Target::Manifest,
        path: update.path,
        changed: update.changed,
        added: Vec::new(),
    })
}

/// Append missing binary paths to the ignore list.
pub fn sync_ignore_list(settings: &Settings, names: &[String], mode: Mode) -> Result<FileChange> {
    let current = read_required(&settings.ignore_path())?;
    let update = ignore::update(&current, names, settings);

    if update.is_changed() && mode.writes() {
        append_file(&update.file.path, &update.appendix)?;
    }

    Ok(FileChange {
        target: Target::IgnoreList,
        changed: update.is_changed(),
        path: update.file.path,
        added: update.added,
    })
}

/// Regenerate the build file from its template.
///
/// In write mode the file is rewritten even when unchanged.
pub fn sync_build_file(settings: &Settings, names: &[String], mode: Mode) -> Result<FileChange> {
    let template = read_required(&settings.template_path())?;

    let path = settings.build_file_path();
    let existing = match fs::read_to_string(&path) {
        Ok(existing) => Some(existing),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(Error::from_read(&path, e)),
    };
    let update = buildfile::update(&template, existing.as_deref(), names, settings);

    if mode.writes() {
        write_file(&update.path, &update.content)?;
    }

    Ok(FileChange {
        target: Target::BuildFile,
        path: update.path,
        changed: update.changed,
        added: Vec::new(),
    })
}

fn read_required(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|e| Error::from_read(path, e))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    debug!("Writing {}", path.display());
    fs::write(path, content).map_err(|e| Error::from_write(path, e))
}

fn append_file(path: &Path, content: &str) -> Result<()> {
    debug!("Appending to {}", path.display());
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| Error::from_write(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::from_write(path, e))
}
