//! # Error Handling
//!
//! This module defines the error type shared by every updater. It uses the
//! `thiserror` library so that each failure carries the path of the file that
//! caused it, which is what an operator needs to fix a broken run.
//!
//! ## Taxonomy
//!
//! - **`MissingFile`**: a required input (manifest, ignore list, build-file
//!   template, settings file) does not exist.
//! - **`Parse`**: the manifest or settings file is not valid YAML, or does
//!   not have the expected shape (a top-level mapping).
//! - **`Read`** / **`Write`**: the filesystem rejected an I/O operation.
//! - **`Settings`**: a settings value is unusable (e.g. an empty path).
//! - **`Discovery`**: the command directory could not be listed.
//!
//! None of these are retried. They propagate to the process boundary, where
//! the binary prints the message and exits non-zero.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for update-configs operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file does not exist.
    #[error("Required file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A file's content is not valid YAML or does not have the expected shape.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Reading an input file failed for a reason other than it being absent.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filesystem rejected a write (permissions, disk full, ...).
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings value is invalid.
    #[error("Invalid settings: {message}")]
    Settings { message: String },

    /// Listing the command directory for name discovery failed.
    #[error("Failed to discover binaries in {}: {message}", path.display())]
    Discovery { path: PathBuf, message: String },

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Classify an I/O error raised while reading `path`.
    ///
    /// `NotFound` becomes [`Error::MissingFile`]; everything else is a
    /// [`Error::Read`].
    pub fn from_read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            Error::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Wrap an I/O error raised while writing `path`.
    pub fn from_write(path: &Path, source: std::io::Error) -> Self {
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
