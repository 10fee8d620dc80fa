//! # Settings
//!
//! Every updater takes its file locations and fixed values from an explicit
//! [`Settings`] value instead of reading the process working directory. The
//! defaults reproduce the repository layout the generator was written for;
//! an optional `update-configs.yaml` in the root (or a file passed with
//! `--settings`) overrides any subset of them.
//!
//! ## Example
//!
//! ```yaml
//! excluded_names: [mcdiff, playground, scratch]
//! image_repository: "quay.io/someone/{{ .ProjectName }}"
//! image:
//!   base_image: quay.io/fedora/fedora:42
//! ```
//!
//! Unknown keys are rejected so that typos do not silently fall back to a
//! default.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Name of the settings file looked up in the root when `--settings` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "update-configs.yaml";

/// Name written into generated headers and ignore-list comments.
pub const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Which generation of the release manifest schema to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishSchema {
    /// Rewrite `builds` and a consolidated `dockers_v2` section, dropping the
    /// superseded `dockers` and `docker_manifests` keys.
    #[default]
    DockersV2,
    /// Rewrite `builds` only.
    BuildsOnly,
}

/// Repository-relative locations of the files the generator reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paths {
    /// Release manifest (YAML).
    pub manifest: PathBuf,
    /// Version-control ignore list.
    pub ignore_file: PathBuf,
    /// Static prefix copied verbatim into the build file.
    pub template: PathBuf,
    /// Generated container build file.
    pub build_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(".goreleaser.yaml"),
            ignore_file: PathBuf::from(".gitignore"),
            template: PathBuf::from("Dockerfile.fetcher"),
            build_file: PathBuf::from("Dockerfile.goreleaser"),
        }
    }
}

/// Fixed instructions appended after the template in the build file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSettings {
    /// Base image of the final stage.
    pub base_image: String,
    /// Name of the template stage that fetches auxiliary binaries.
    pub fetcher_stage: String,
    /// Directory inside the fetcher stage holding the auxiliary binaries.
    pub fetcher_dir: String,
    /// Auxiliary binaries copied out of the fetcher stage, in order.
    pub fetched_binaries: Vec<String>,
    /// Installation directory for every binary in the final image.
    pub install_dir: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            base_image: "quay.io/fedora/fedora:43".to_string(),
            fetcher_stage: "fetcher".to_string(),
            fetcher_dir: "/oc".to_string(),
            fetched_binaries: vec!["oc".to_string(), "kubectl".to_string()],
            install_dir: "/usr/local/bin".to_string(),
        }
    }
}

/// Configuration shared by all updaters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory every relative path is resolved against. Never read from
    /// the settings file; set by the caller.
    #[serde(skip)]
    pub root: PathBuf,
    /// File locations, relative to `root`.
    pub paths: Paths,
    /// Directory holding one sub-directory per binary (`<cmd_dir>/<name>`).
    pub cmd_dir: String,
    /// Names that are never turned into builds.
    pub excluded_names: BTreeSet<String>,
    /// Manifest schema generation to emit.
    pub publish_schema: PublishSchema,
    /// Go package whose `version`, `commit`, `date` and `builtBy` variables
    /// are stamped through the linker flags.
    pub version_package: String,
    /// Container image repository template.
    pub image_repository: String,
    /// Build-file instructions.
    pub image: ImageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            paths: Paths::default(),
            cmd_dir: "cmd".to_string(),
            excluded_names: ["mcdiff", "playground"]
                .into_iter()
                .map(String::from)
                .collect(),
            publish_schema: PublishSchema::default(),
            version_package: "github.com/cheesesashimi/zacks-openshift-helpers/internal/pkg/version"
                .to_string(),
            image_repository: "quay.io/zzlotnik/{{ .ProjectName }}".to_string(),
            image: ImageSettings::default(),
        }
    }
}

impl Settings {
    /// Default settings rooted at `root`.
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load settings for `root`.
    ///
    /// When `explicit` is given it must exist. Otherwise
    /// [`DEFAULT_SETTINGS_FILE`] is read from `root` if present, and the
    /// built-in defaults are used if it is not. Relative `explicit` paths are
    /// taken as given (relative to the process, like any CLI path argument).
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(DEFAULT_SETTINGS_FILE);
                if !candidate.is_file() {
                    debug!("No settings file at {}, using defaults", candidate.display());
                    return Ok(Self::with_root(root));
                }
                candidate
            }
        };

        let content =
            std::fs::read_to_string(&path).map_err(|e| Error::from_read(&path, e))?;
        let mut settings = Self::parse(&content).map_err(|message| Error::Parse {
            path: path.clone(),
            message,
        })?;
        settings.root = root.to_path_buf();
        settings.validate()?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse a settings document. An empty document yields the defaults.
    fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Reject values no updater can work with.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("paths.manifest", self.paths.manifest.as_os_str().is_empty()),
            ("paths.ignore_file", self.paths.ignore_file.as_os_str().is_empty()),
            ("paths.template", self.paths.template.as_os_str().is_empty()),
            ("paths.build_file", self.paths.build_file.as_os_str().is_empty()),
            ("cmd_dir", self.cmd_dir.trim().is_empty()),
            ("image.base_image", self.image.base_image.trim().is_empty()),
            ("image.install_dir", self.image.install_dir.trim().is_empty()),
        ];

        if let Some((key, _)) = required.iter().find(|(_, empty)| *empty) {
            return Err(Error::Settings {
                message: format!("'{}' must not be empty", key),
            });
        }
        Ok(())
    }

    /// Absolute (root-joined) path of the release manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.paths.manifest)
    }

    /// Absolute (root-joined) path of the ignore list.
    pub fn ignore_path(&self) -> PathBuf {
        self.root.join(&self.paths.ignore_file)
    }

    /// Absolute (root-joined) path of the build-file template.
    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.paths.template)
    }

    /// Absolute (root-joined) path of the generated build file.
    pub fn build_file_path(&self) -> PathBuf {
        self.root.join(&self.paths.build_file)
    }

    /// Directory scanned by name discovery.
    pub fn cmd_path(&self) -> PathBuf {
        self.root.join(&self.cmd_dir)
    }

    /// Relative path of the binary `go build` leaves behind for `name`.
    pub fn binary_output_path(&self, name: &str) -> String {
        format!("{}/{}/{}", self.cmd_dir, name, name)
    }
}
