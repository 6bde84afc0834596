// src/exec/runner.rs

//! Launch the target, drain stdout and stderr into one buffer, wait.

use std::borrow::Cow;
use std::process::{ExitStatus, Stdio};

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, TaskmailError};
use crate::exec::output::OutputBuffer;
use crate::exec::result::RunResult;
use crate::exec::target::TargetCommand;

type DrainHandle = JoinHandle<std::io::Result<usize>>;

/// Run `target` to completion and capture its combined output.
///
/// A target that cannot be started (missing binary, permission denied) is
/// not an error: it becomes a `RunResult` with exit code 1 and a
/// "Failed to start the task" message. I/O faults while draining or waiting
/// are returned as errors.
///
/// The result is only built once the process has exited **and** both
/// streams have reached EOF, so output written just before exit is kept.
pub async fn run_process(target: &TargetCommand) -> Result<RunResult> {
    info!(cmd = %target.display(), "starting task process");

    let mut cmd = build_command(target);
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(cmd = %target.display(), error = %err, "failed to start task process");
            return Ok(RunResult::launch_failure(err));
        }
    };

    let buffer = OutputBuffer::new();
    let stdout_task = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(drain_lines(stdout, buffer.clone())));
    let stderr_task = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(drain_lines(stderr, buffer.clone())));

    let (status, stdout_lines, stderr_lines) = tokio::join!(
        child.wait(),
        join_drain(stdout_task, "stdout"),
        join_drain(stderr_task, "stderr"),
    );

    let status = status?;
    let stdout_lines = stdout_lines?;
    let stderr_lines = stderr_lines?;
    let exit_code = exit_code_of(status);

    info!(
        exit_code,
        stdout_lines,
        stderr_lines,
        success = status.success(),
        "task process exited"
    );

    Ok(RunResult::new(exit_code, buffer.contents()))
}

#[cfg(windows)]
fn build_command(target: &TargetCommand) -> Command {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let mut cmd = Command::new("cmd");
    cmd.raw_arg(format!("/C \"{}\"", target.escaped()))
        .creation_flags(CREATE_NO_WINDOW);
    cmd
}

#[cfg(not(windows))]
fn build_command(target: &TargetCommand) -> Command {
    let mut cmd = Command::new(target.program());
    cmd.args(target.args());
    cmd
}

/// Read `reader` line by line into `buffer` until EOF.
///
/// Returns the number of lines appended.
async fn drain_lines<R>(reader: R, buffer: OutputBuffer) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    let mut count = 0;

    while let Some(segment) = segments.next_segment().await? {
        buffer.append_line(&decode_line(&segment));
        count += 1;
    }

    Ok(count)
}

async fn join_drain(task: Option<DrainHandle>, stream: &'static str) -> Result<usize> {
    let Some(task) = task else {
        return Ok(0);
    };

    let lines = task
        .await
        .map_err(|e| TaskmailError::Other(anyhow!("{stream} reader task failed: {e}")))??;

    debug!(stream, lines, "stream drained");
    Ok(lines)
}

/// Strip a trailing `\r` and decode lossily; task output is not guaranteed
/// to be UTF-8.
fn decode_line(segment: &[u8]) -> Cow<'_, str> {
    let segment = segment.strip_suffix(b"\r").unwrap_or(segment);
    String::from_utf8_lossy(segment)
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
