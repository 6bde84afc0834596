// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the target command,
//! using `tokio::process::Command`, and capturing everything it writes.
//!
//! - [`runner`] spawns the process and drains stdout/stderr concurrently.
//! - [`output`] is the lock-guarded buffer both drainers append to.
//! - [`escape`] turns an argument vector back into a command line.
//! - [`target`] and [`result`] are the input and output of a run.
//! - [`backend`] provides the `RunnerBackend` trait and the concrete
//!   `ProcessRunner`, which tests can replace with a fake implementation.

pub mod backend;
pub mod escape;
pub mod output;
pub mod result;
pub mod runner;
pub mod target;

pub use backend::{ProcessRunner, RunnerBackend};
pub use escape::{display_command_line, escape_arguments};
pub use output::OutputBuffer;
pub use result::RunResult;
pub use runner::run_process;
pub use target::TargetCommand;
