// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Only `-h/--help` and `-v/--version` are recognised as options. Everything
//! from the program name onward is captured verbatim, so `rept ls -l` passes
//! `-l` to `ls` rather than treating it as an option of our own.

use std::ffi::OsString;

use clap::{ArgAction, Parser};

/// Command-line arguments for `rept`.
///
/// An unrecognised option before the program name is reported in clap's own
/// wording ("unexpected argument '-x' found") rather than as
/// "unknown option: -x"; the exit status is non-zero either way.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rept",
    version,
    about = "Run a program repeatedly until its output pipe is closed.",
    long_about = None,
    disable_version_flag = true,
    arg_required_else_help = true
)]
pub struct CliArgs {
    /// Print name and version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Program to run, followed by its arguments.
    #[arg(
        value_name = "PROGRAM",
        required = true,
        num_args = 1..,
        trailing_var_arg = true
    )]
    pub command: Vec<OsString>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
