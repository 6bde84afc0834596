// tests/process_capture.rs
//
// Runs real child processes through `ProcessRunner`.

#![cfg(unix)]

mod common;
use crate::common::builders::{MailSettingsBuilder, PolicyBuilder, test_identity};
use crate::common::{RecordingTransport, init_tracing, with_timeout};

use std::error::Error;

use taskmail::exec::{ProcessRunner, RunnerBackend, TargetCommand};
use taskmail::execute;

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str) -> TargetCommand {
    TargetCommand::new("sh", ["-c", script])
}

#[tokio::test]
async fn every_line_from_both_streams_is_captured() -> TestResult {
    init_tracing();

    let script = "i=0; while [ $i -lt 2000 ]; do echo out$i; echo err$i >&2; i=$((i+1)); done";
    let mut runner = ProcessRunner::new();
    let result = with_timeout(runner.run(&sh(script))).await?;

    assert_eq!(result.exit_code(), 0);

    let lines: Vec<&str> = result.output().lines().collect();
    assert_eq!(lines.len(), 4000);

    // Order between the streams is not fixed, but each stream keeps its own.
    let out: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with("out")).collect();
    let err: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with("err")).collect();
    assert_eq!(out.len(), 2000);
    assert_eq!(err.len(), 2000);
    assert_eq!(out[0], "out0");
    assert_eq!(out[1999], "out1999");
    assert_eq!(err[1999], "err1999");
    Ok(())
}

#[tokio::test]
async fn exit_code_is_passed_through() -> TestResult {
    let mut runner = ProcessRunner::new();
    let result = with_timeout(runner.run(&sh("exit 42"))).await?;

    assert_eq!(result.exit_code(), 42);
    assert!(!result.has_output());
    Ok(())
}

#[tokio::test]
async fn unterminated_last_line_is_kept() -> TestResult {
    let mut runner = ProcessRunner::new();
    let result = with_timeout(runner.run(&sh("printf 'first\\nlast'"))).await?;

    assert_eq!(result.output(), "first\nlast\n");
    Ok(())
}

#[tokio::test]
async fn arguments_reach_the_child_unchanged() -> TestResult {
    let target = TargetCommand::new(
        "sh",
        ["-c", "printf '%s\\n' \"$@\"", "sh", "two words", "quote\"d", ""],
    );
    let mut runner = ProcessRunner::new();
    let result = with_timeout(runner.run(&target)).await?;

    assert_eq!(result.output(), "two words\nquote\"d\n\n");
    Ok(())
}

#[tokio::test]
async fn missing_program_is_a_launch_failure() -> TestResult {
    let target = TargetCommand::new("taskmail-no-such-program-xyz", Vec::<String>::new());
    let mut runner = ProcessRunner::new();
    let result = with_timeout(runner.run(&target)).await?;

    assert_eq!(result.exit_code(), 1);
    assert!(result.output().starts_with("Failed to start the task: "));
    Ok(())
}

#[tokio::test]
async fn non_executable_file_is_a_launch_failure() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let mut script = tempfile::NamedTempFile::new()?;
    std::io::Write::write_all(&mut script, b"#!/bin/sh\necho hello\n")?;
    let script = script.into_temp_path();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644))?;

    let target = TargetCommand::new(script.to_string_lossy(), Vec::<String>::new());
    let mut runner = ProcessRunner::new();
    let result = with_timeout(runner.run(&target)).await?;

    assert_eq!(result.exit_code(), 1);
    assert!(result.output().starts_with("Failed to start the task: "), "{}", result.output());
    assert!(!result.output().contains("hello"));
    Ok(())
}

#[tokio::test]
async fn quiet_successful_command_is_not_reported() -> TestResult {
    let mut runner = ProcessRunner::new();
    let mut transport = RecordingTransport::new();

    let code = with_timeout(execute(
        &TargetCommand::new("true", Vec::<String>::new()),
        &PolicyBuilder::new().build(),
        &MailSettingsBuilder::new().build(),
        &test_identity(),
        &mut runner,
        &mut transport,
    ))
    .await?;

    assert_eq!(code, 0);
    assert!(transport.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn failing_command_is_reported_and_its_code_returned() -> TestResult {
    let mut runner = ProcessRunner::new();
    let mut transport = RecordingTransport::new();

    let code = with_timeout(execute(
        &sh("exit 5"),
        &PolicyBuilder::new().build(),
        &MailSettingsBuilder::new().build(),
        &test_identity(),
        &mut runner,
        &mut transport,
    ))
    .await?;

    assert_eq!(code, 5);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Exit code: 5"));
    Ok(())
}
