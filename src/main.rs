//! # update-configs CLI
//!
//! This is the binary entry point for the `update-configs` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the updaters through the library.
//! - Translating the outcome into an exit status: 0 on success, 1 on any
//!   error or when `--check` finds stale files, 2 for usage errors.
//!
//! The updaters themselves live in the library crate, so the binary stays a
//! thin wrapper around them.

mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    match cli.execute()? {
        cli::Outcome::Success => Ok(ExitCode::SUCCESS),
        cli::Outcome::Stale => Ok(ExitCode::FAILURE),
    }
}
