// src/exec/backend.rs

//! Pluggable runner backend abstraction.
//!
//! The orchestration in [`crate::execute`] talks to a `RunnerBackend`
//! instead of spawning processes directly. This makes it easy to swap in a
//! fake runner in tests while keeping the production implementation in
//! [`super::runner`].
//!
//! - `ProcessRunner` is the default implementation used by `taskmail`.
//! - Tests can provide their own `RunnerBackend` that, for example, records
//!   the command and returns a canned `RunResult`.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::result::RunResult;
use crate::exec::runner::run_process;
use crate::exec::target::TargetCommand;

/// Trait abstracting how the target command is executed.
pub trait RunnerBackend: Send {
    /// Run `target` to completion.
    ///
    /// Implementations must report launch failures as a `RunResult`, not as
    /// an error.
    fn run<'a>(
        &'a mut self,
        target: &'a TargetCommand,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>>;
}

/// Real runner backend: spawns an OS process per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl RunnerBackend for ProcessRunner {
    fn run<'a>(
        &'a mut self,
        target: &'a TargetCommand,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>> {
        Box::pin(run_process(target))
    }
}
