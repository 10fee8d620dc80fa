//! Release manifest updates
//!
//! This module rewrites the `builds` section (and, for the current schema
//! generation, the consolidated `dockers_v2` section) of a release manifest
//! while leaving every other top-level key exactly where it was.
//!
//! ## Approach
//!
//! The manifest is parsed into a [`serde_yaml::Mapping`], the owned sections
//! are replaced in place, superseded keys are dropped, and the mapping is
//! serialized again. `serde_yaml` never emits anchors or aliases, so every
//! build entry is written out in full, which is what the release tool needs.
//!
//! Template expressions such as `{{ .Version }}` or
//! `{{ if index .Env "GITHUB_RUN_ID" }}` belong to the release tool. They are
//! written verbatim and never evaluated here.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};
use crate::settings::{PublishSchema, Settings};
use crate::update::FileUpdate;

/// Top-level key holding the build descriptors.
pub const BUILDS_KEY: &str = "builds";

/// Top-level key holding the consolidated publish descriptors.
pub const PUBLISH_KEY: &str = "dockers_v2";

/// Keys replaced by [`PUBLISH_KEY`] and removed whenever it is written.
pub const SUPERSEDED_KEYS: [&str; 2] = ["dockers", "docker_manifests"];

const TARGET_OS: [&str; 2] = ["darwin", "linux"];
const TARGET_ARCH: [&str; 2] = ["amd64", "arm64"];
const IMAGE_PLATFORMS: [&str; 2] = ["linux/amd64", "linux/arm64"];

/// How the release tool builds one binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    pub main: String,
    pub id: String,
    pub binary: String,
    pub env: Vec<String>,
    pub ldflags: Vec<String>,
    pub goos: Vec<String>,
    pub goarch: Vec<String>,
}

impl BuildDescriptor {
    /// Build descriptor for the binary living in `<cmd_dir>/<name>`.
    pub fn for_name(name: &str, settings: &Settings) -> Self {
        let pkg = &settings.version_package;
        let ldflags = format!(
            "-s -w -X {pkg}.version={{{{.Version}}}} -X {pkg}.commit={{{{.Commit}}}} \
             -X {pkg}.date={{{{.Date}}}} -X {pkg}.builtBy=goreleaser"
        );

        Self {
            main: format!("./{}/{}", settings.cmd_dir, name),
            id: name.to_string(),
            binary: name.to_string(),
            env: vec!["CGO_ENABLED=0".to_string()],
            ldflags: vec![ldflags],
            goos: to_strings(&TARGET_OS),
            goarch: to_strings(&TARGET_ARCH),
        }
    }
}

/// How build artifacts are packaged into one multi-platform container image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishDescriptor {
    pub dockerfile: String,
    pub ids: Vec<String>,
    pub images: Vec<String>,
    pub platforms: Vec<String>,
    pub tags: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

impl PublishDescriptor {
    /// Publish descriptor covering every build in `builds`.
    pub fn for_builds(builds: &[BuildDescriptor], settings: &Settings) -> Self {
        Self {
            dockerfile: settings.paths.build_file.to_string_lossy().into_owned(),
            ids: builds.iter().map(|b| b.id.clone()).collect(),
            images: vec![settings.image_repository.clone()],
            platforms: to_strings(&IMAGE_PLATFORMS),
            tags: vec!["{{ .Version }}".to_string(), "latest".to_string()],
            labels: image_labels(),
        }
    }
}

/// OCI labels plus the GitHub Actions labels that only render when the
/// release runs inside a workflow.
fn image_labels() -> BTreeMap<String, String> {
    let oci = [
        ("org.opencontainers.image.title", "{{ .ProjectName }}"),
        ("org.opencontainers.image.description", "{{ .ProjectName }}"),
        (
            "org.opencontainers.image.url",
            "https://github.com/cheesesashimi/{{ .ProjectName }}",
        ),
        (
            "org.opencontainers.image.source",
            "https://github.com/cheesesashimi/{{ .ProjectName }}",
        ),
        ("org.opencontainers.image.version", "{{ .Version }}"),
        ("org.opencontainers.image.created", "{{ .Date }}"),
        ("org.opencontainers.image.revision", "{{ .FullCommit }}"),
    ];

    let mut labels: BTreeMap<String, String> = oci
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    labels.insert(
        r#"{{ if index .Env "GITHUB_ACTIONS" }}com.github.actions{{else}}label-no-actions-env-1{{end}}"#
            .to_string(),
        String::new(),
    );

    let env_labels = [
        ("GITHUB_RUN_ID", "com.github.actions.runId"),
        ("GITHUB_RUN_NUMBER", "com.github.actions.runNumber"),
        ("GITHUB_WORKFLOW", "com.github.actions.workflow"),
        ("RUNNER_NAME", "com.github.actions.runnerName"),
    ];
    for (i, (var, key)) in env_labels.iter().enumerate() {
        labels.insert(
            format!(
                r#"{{{{ if index .Env "{var}" }}}}{key}{{{{else}}}}label-no-actions-env-{n}{{{{end}}}}"#,
                n = i + 2
            ),
            format!(r#"{{{{ if index .Env "{var}" }}}}{{{{ .Env.{var} }}}}{{{{else}}}}{{{{end}}}}"#),
        );
    }

    labels
}

/// Build descriptors for `names`, sorted by identifier.
pub fn build_descriptors(names: &[String], settings: &Settings) -> Vec<BuildDescriptor> {
    let mut builds: Vec<BuildDescriptor> = names
        .iter()
        .map(|name| BuildDescriptor::for_name(name, settings))
        .collect();
    builds.sort_by(|a, b| a.id.cmp(&b.id));
    builds.dedup_by(|a, b| a.id == b.id);
    builds
}

/// Parse the first YAML document of a manifest into its top-level mapping.
///
/// Further documents are ignored (and dropped on write).
pub fn parse_manifest(content: &str, path: &Path) -> Result<Mapping> {
    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut documents = serde_yaml::Deserializer::from_str(content);
    let first = documents
        .next()
        .ok_or_else(|| parse_error("no YAML document found".to_string()))?;
    let value = YamlValue::deserialize(first).map_err(|e| parse_error(e.to_string()))?;

    if documents.next().is_some() {
        warn!(
            "{}: only the first YAML document is kept, later documents will be dropped",
            path.display()
        );
    }

    match value {
        YamlValue::Mapping(map) => Ok(map),
        other => Err(parse_error(format!(
            "expected a mapping at the top level, found {}",
            yaml_type_name(&other)
        ))),
    }
}

/// Compute the new manifest content for `names`.
pub fn update(current: &str, names: &[String], settings: &Settings) -> Result<FileUpdate> {
    let path = settings.manifest_path();
    let mut document = parse_manifest(current, &path)?;

    let keep_octal = !current.contains(OCTAL_MARKER);
    if keep_octal {
        document.values_mut().for_each(mark_octal_literals);
    }

    let builds = build_descriptors(names, settings);
    debug!("{}: writing {} builds", path.display(), builds.len());
    document.insert(
        YamlValue::String(BUILDS_KEY.to_string()),
        serde_yaml::to_value(&builds)?,
    );

    if settings.publish_schema == PublishSchema::DockersV2 {
        let publish = vec![PublishDescriptor::for_builds(&builds, settings)];
        document.insert(
            YamlValue::String(PUBLISH_KEY.to_string()),
            serde_yaml::to_value(&publish)?,
        );

        document = document
            .into_iter()
            .filter(|(key, _)| match key.as_str() {
                Some(k) if SUPERSEDED_KEYS.contains(&k) => {
                    debug!("{}: removing superseded key '{}'", path.display(), k);
                    false
                }
                _ => true,
            })
            .collect();
    }

    let mut content = serde_yaml::to_string(&YamlValue::Mapping(document))?;
    if keep_octal {
        content = content.replace(OCTAL_MARKER, "");
    }

    Ok(FileUpdate::new(path, Some(current), content))
}

/// Prefix that makes an octal-looking string serialize as a plain scalar.
///
/// `serde_yaml` reads `mode: 0644` as the string `"0644"` and would write it
/// back quoted. Marked strings are written plain and the prefix is stripped
/// from the output, so the release tool keeps reading a YAML 1.1 octal.
const OCTAL_MARKER: &str = "update_configs_octal_";

fn is_octal_literal(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0') && s.bytes().all(|b| (b'0'..=b'7').contains(&b))
}

fn mark_octal_literals(value: &mut YamlValue) {
    match value {
        YamlValue::String(s) if is_octal_literal(s.as_str()) => s.insert_str(0, OCTAL_MARKER),
        YamlValue::Sequence(items) => items.iter_mut().for_each(mark_octal_literals),
        YamlValue::Mapping(map) => map.values_mut().for_each(mark_octal_literals),
        YamlValue::Tagged(tagged) => mark_octal_literals(&mut tagged.value),
        _ => {}
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}
