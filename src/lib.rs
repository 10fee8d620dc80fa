//! # update-configs
//!
//! This library keeps a repository's release configuration in step with the
//! set of binaries it ships. Given a list of binary names it:
//!
//! 1.  rewrites the `builds` section (and the consolidated `dockers_v2`
//!     publish section) of the release manifest, preserving every other key;
//! 2.  appends the binaries' build output paths to the ignore list;
//! 3.  regenerates the container build file from a static template.
//!
//! ## Quick Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use update_configs::names::resolve_names;
//! use update_configs::settings::Settings;
//! use update_configs::buildfile;
//!
//! let excluded: BTreeSet<String> = ["baz".to_string()].into();
//! let names = resolve_names(["foo", "bar", "baz"], &excluded);
//! assert_eq!(names, vec!["bar", "foo"]);
//!
//! let rendered = buildfile::render("FROM base\n", &names, &Settings::default());
//! assert!(rendered.ends_with("COPY $TARGETPLATFORM/foo /usr/local/bin/foo\n"));
//! ```
//!
//! ## Modules
//!
//! - **`settings`**: file locations and fixed values, loaded from an optional
//!   `update-configs.yaml`.
//! - **`names`**: resolution (sort, de-duplicate, exclude) and discovery of
//!   binary names.
//! - **`manifest`**, **`ignore`**, **`buildfile`**: pure transforms from
//!   current file content to an [`update::FileUpdate`].
//! - **`sync`**: reads the files, applies the transforms in order and writes
//!   the results.
//! - **`output`**: the change summary shown to the operator.

pub mod buildfile;
pub mod error;
pub mod ignore;
pub mod manifest;
pub mod names;
pub mod output;
pub mod settings;
pub mod sync;
pub mod update;

#[cfg(test)]
mod names_proptest;
