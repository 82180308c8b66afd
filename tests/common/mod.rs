// tests/common/mod.rs

#![allow(dead_code)]

use rept::command::CommandLine;
use rept::config::RunConfig;

pub use rept_test_utils::init_tracing;

pub fn command(argv: &[&str]) -> CommandLine {
    CommandLine::new(argv.iter().copied()).expect("valid command line")
}

pub fn config(argv: &[&str]) -> RunConfig {
    RunConfig::new(command(argv))
}
