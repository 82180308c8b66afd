// tests/end_to_end.rs

#![cfg(unix)]

use std::fs;
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const REPT: &str = env!("CARGO_BIN_EXE_rept");

fn spawn_rept(args: &[&str]) -> Child {
    Command::new(REPT)
        .args(args)
        .env_remove("REPT_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawning rept")
}

fn rept_output(args: &[&str]) -> Output {
    Command::new(REPT)
        .args(args)
        .env_remove("REPT_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("running rept")
}

/// Wait for `child`, killing it and failing the test if it takes too long.
fn wait_with_deadline(child: &mut Child) -> ExitStatus {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(status) = child.try_wait().expect("try_wait") {
            return status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("rept did not exit after its consumer went away");
        }
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_reading_one_byte_then_closing_exits_zero() {
    let mut child = spawn_rept(&["printf", "ab"]);
    let mut stdout = child.stdout.take().unwrap();

    let mut byte = [0u8; 1];
    stdout.read_exact(&mut byte).unwrap();
    assert_eq!(&byte, b"a");
    drop(stdout);

    assert!(wait_with_deadline(&mut child).success());
}

#[test]
fn test_silent_command_with_closed_consumer_exits_zero() {
    let mut child = spawn_rept(&["false"]);
    drop(child.stdout.take());

    assert!(wait_with_deadline(&mut child).success());
}

#[test]
fn test_output_repeats_without_loss() {
    let mut child = spawn_rept(&["printf", "0123456789"]);
    let mut stdout = child.stdout.take().unwrap();

    let mut buf = vec![0u8; 100_000];
    stdout.read_exact(&mut buf).unwrap();
    drop(stdout);

    let expected = b"0123456789".repeat(10_000);
    assert_eq!(buf, expected);
    assert!(wait_with_deadline(&mut child).success());
}

#[test]
fn test_endless_command_stops_with_consumer() {
    let mut child = spawn_rept(&["yes", "rept"]);
    let mut stdout = child.stdout.take().unwrap();

    let mut buf = [0u8; 10];
    stdout.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"rept\nrept\n");
    drop(stdout);

    assert!(wait_with_deadline(&mut child).success());
}

#[test]
fn test_command_is_respawned_while_consumer_attached() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("spawns");
    let script = format!("echo run >> '{}'", counter.display());

    let mut child = spawn_rept(&["sh", "-c", script.as_str()]);
    let stdout = child.stdout.take().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let runs = loop {
        let runs = fs::read_to_string(&counter)
            .map(|s| s.lines().count())
            .unwrap_or(0);
        if runs >= 5 || Instant::now() > deadline {
            break runs;
        }
        thread::sleep(Duration::from_millis(10));
    };
    assert!(runs >= 5, "only {runs} spawns observed");
    assert!(child.try_wait().unwrap().is_none(), "rept exited early");

    drop(stdout);
    assert!(wait_with_deadline(&mut child).success());
}

#[test]
fn test_stdin_is_inherited_by_child() {
    let mut child = Command::new(REPT)
        .args(["cat"])
        .env_remove("REPT_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"hello").unwrap();
    drop(stdin);

    let mut stdout = child.stdout.take().unwrap();
    let mut buf = [0u8; 5];
    stdout.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"hello");
    drop(stdout);

    assert!(wait_with_deadline(&mut child).success());
}

#[test]
fn test_missing_program_exits_non_zero_with_message() {
    let out = rept_output(&["rept-test-no-such-program"]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("rept: "), "stderr: {stderr}");
    assert!(stderr.contains("rept-test-no-such-program"), "stderr: {stderr}");
}

#[test]
fn test_help_exits_zero() {
    for flag in ["-h", "--help"] {
        let out = rept_output(&[flag]);
        assert!(out.status.success());
        assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
    }
}

#[test]
fn test_version_exits_zero() {
    for flag in ["-v", "--version"] {
        let out = rept_output(&[flag]);
        assert!(out.status.success());
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert_eq!(stdout.trim(), format!("rept {}", env!("CARGO_PKG_VERSION")));
    }
}

#[test]
fn test_no_arguments_prints_usage_and_fails() {
    let out = rept_output(&[]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn test_unknown_option_fails() {
    let out = rept_output(&["-x", "date"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("-x"));
}
