//! CLI argument parsing and run dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use update_configs::names::{discover_names, resolve_names};
use update_configs::output::{render_report, OutputConfig};
use update_configs::settings::{PublishSchema, Settings};
use update_configs::sync::{self, Mode};

/// Regenerate the release manifest, ignore list and container build file
/// for a set of binaries.
#[derive(Parser, Debug)]
#[command(name = "update-configs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Binary names (one per directory under cmd/)
    #[arg(value_name = "NAMES")]
    names: Vec<String>,

    /// Repository root every configured path is relative to
    #[arg(long, value_name = "DIR", env = "UPDATE_CONFIGS_ROOT")]
    root: Option<PathBuf>,

    /// Settings file (defaults to update-configs.yaml in the root, if present)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Also include every directory found under cmd/
    #[arg(long)]
    discover: bool,

    /// Only rewrite the builds section of the manifest
    #[arg(long)]
    builds_only: bool,

    /// Show what would change without writing anything
    #[arg(short = 'n', long, conflicts_with = "check")]
    dry_run: bool,

    /// Exit with status 1 if any file is out of date; writes nothing
    #[arg(long)]
    check: bool,

    /// Suppress the change summary
    #[arg(short, long)]
    quiet: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

/// What the process should report back to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `--check` found files that are out of date.
    Stale,
}

impl Cli {
    /// Execute the run described by the parsed arguments
    pub fn execute(self) -> Result<Outcome> {
        init_logging(self.log_level);

        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let mut settings = Settings::load(&root, self.settings.as_deref())?;
        if self.builds_only {
            settings.publish_schema = PublishSchema::BuildsOnly;
        }

        let mut raw = self.names;
        if self.discover {
            raw.extend(discover_names(&settings.cmd_path())?);
        }
        let names = resolve_names(&raw, &settings.excluded_names);
        debug!("Resolved names: {:?}", names);

        let mode = if self.check {
            Mode::Check
        } else if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Write
        };

        let report = sync::run(&settings, &names, mode)?;

        if !self.quiet {
            let output = OutputConfig::from_env_and_flag(&self.color);
            print!("{}", render_report(&report, &settings.root, &output));
        }

        if mode == Mode::Check && report.has_changes() {
            eprintln!("Generated files are out of date; run update-configs without --check");
            return Ok(Outcome::Stale);
        }

        Ok(Outcome::Success)
    }
}

/// `RUST_LOG`, when set, takes precedence over `--log-level`.
fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_free_names() {
        let cli = Cli::try_parse_from(["update-configs", "foo", "bar"]).unwrap();
        assert_eq!(cli.names, vec!["foo", "bar"]);
        assert!(!cli.dry_run);
        assert_eq!(cli.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_dry_run_conflicts_with_check() {
        let result = Cli::try_parse_from(["update-configs", "--dry-run", "--check", "foo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_parses() {
        let cli = Cli::try_parse_from(["update-configs", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert!(cli.names.is_empty());
    }
}
