//! Shared test utilities for CLI E2E tests.
//!
//! This module provides a repository fixture pre-populated with the files the
//! generator reads, plus the content constants used to build it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_repository();
//!     fixture.command().arg("foo").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::files;
    pub use super::TestFixture;
}

/// File contents used to seed fixtures.
#[allow(dead_code)]
pub mod files {
    /// Manifest with unrelated keys around a stale `builds` section and the
    /// superseded publish keys.
    pub const MANIFEST: &str = r#"version: 2
project_name: zacks-openshift-helpers
before:
  hooks:
    - go mod tidy
builds:
  - id: stale
    main: ./cmd/stale
dockers:
  - image_templates:
      - "quay.io/zzlotnik/{{ .ProjectName }}:{{ .Version }}-amd64"
docker_manifests:
  - name_template: "quay.io/zzlotnik/{{ .ProjectName }}:{{ .Version }}"
changelog:
  sort: asc
"#;

    /// Ignore list that already covers `foo`.
    pub const GITIGNORE: &str = "/dist\n# Auto-added by update-configs to ignore ad-hoc Go binaries\ncmd/foo/foo\n";

    /// Build-file template.
    pub const TEMPLATE: &str = "FROM base\nRUN install-fetcher\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "builds: [unclosed";
}

/// A test fixture that provides a temporary repository root.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add the manifest, ignore list and template the generator expects.
    pub fn with_repository(self) -> Self {
        self.with_file(".goreleaser.yaml", files::MANIFEST)
            .with_file(".gitignore", files::GITIGNORE)
            .with_file("Dockerfile.fetcher", files::TEMPLATE)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create `cmd/<name>/main.go` for each name.
    pub fn with_commands(self, names: &[&str]) -> Self {
        for name in names {
            self.temp_dir
                .child(format!("cmd/{}/main.go", name))
                .write_str("package main\n")
                .expect("Failed to write command");
        }
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file from the fixture.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("update-configs");
        cmd.current_dir(self.path())
            .env_remove("UPDATE_CONFIGS_ROOT")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
