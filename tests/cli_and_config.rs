// tests/cli_and_config.rs

mod common;

use std::ffi::OsString;

use clap::Parser;
use clap::error::ErrorKind;
use rept::cli::CliArgs;
use rept::command::CommandLine;
use rept::config::{PACKAGE, RunConfig};
use rept::drain::DEFAULT_BUFFER_SIZE;
use rept::errors::ReptError;
use rept::logging::parse_level_str;

fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse_from(std::iter::once("rept").chain(args.iter().copied()))
}

fn os(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn test_program_and_arguments_are_captured() {
    let args = parse(&["date", "+%s"]).unwrap();
    assert_eq!(args.command, os(&["date", "+%s"]));
}

#[test]
fn test_options_after_program_belong_to_the_child() {
    let args = parse(&["ls", "-l", "--all", "-h", "--version"]).unwrap();
    assert_eq!(args.command, os(&["ls", "-l", "--all", "-h", "--version"]));
}

#[test]
fn test_help_flags() {
    for flag in ["-h", "--help"] {
        let err = parse(&[flag]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp, "{flag}");
        assert_eq!(err.exit_code(), 0);
    }
}

#[test]
fn test_version_flags() {
    for flag in ["-v", "--version"] {
        let err = parse(&[flag]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion, "{flag}");
        assert_eq!(err.exit_code(), 0);
    }
}

#[test]
fn test_unknown_option_before_program_is_rejected() {
    let err = parse(&["-x", "date"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    assert_ne!(err.exit_code(), 0);

    let err = parse(&["--frobnicate"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn test_missing_program_is_a_usage_error() {
    let err = parse(&[]).unwrap_err();
    assert_eq!(
        err.kind(),
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    );
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn test_double_dash_separates_program() {
    let args = parse(&["--", "-weird-program-name"]).unwrap();
    assert_eq!(args.command, os(&["-weird-program-name"]));
}

#[test]
fn test_command_line_requires_a_program() {
    let empty: Vec<&str> = Vec::new();
    assert!(matches!(CommandLine::new(empty), Err(ReptError::Usage(_))));
    assert!(matches!(CommandLine::new([""]), Err(ReptError::Usage(_))));
}

#[test]
fn test_command_line_accessors() {
    let cmd = CommandLine::new(["printf", "%s", ""]).unwrap();
    assert_eq!(cmd.program(), "printf");
    assert_eq!(cmd.args(), &os(&["%s", ""])[..]);
    assert_eq!(cmd.argv().len(), 3);
    assert_eq!(cmd.to_string(), "printf %s ");
}

#[test]
fn test_run_config_defaults() {
    let cfg = RunConfig::from_args(parse(&["date"]).unwrap()).unwrap();
    assert_eq!(cfg.name, PACKAGE);
    assert_eq!(cfg.name, "rept");
    assert_eq!(cfg.buffer_size, DEFAULT_BUFFER_SIZE);
    assert_eq!(cfg.command.program(), "date");
}

#[test]
fn test_run_config_rejects_zero_buffer() {
    let cfg = common::config(&["date"]);
    assert!(matches!(cfg.with_buffer_size(0), Err(ReptError::Usage(_))));
}

#[test]
fn test_log_level_parsing() {
    assert_eq!(parse_level_str("DEBUG"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str(" warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);
}
