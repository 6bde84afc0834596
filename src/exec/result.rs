// src/exec/result.rs

use std::fmt;

/// Exit code and combined stdout/stderr text of one finished run.
///
/// `output` is never absent: a run that printed nothing has `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunResult {
    exit_code: i32,
    output: String,
}

impl RunResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// A result with no captured output.
    pub fn with_exit_code(exit_code: i32) -> Self {
        Self::new(exit_code, String::new())
    }

    /// Synthetic result for a target that could not be started at all.
    pub fn launch_failure(reason: impl fmt::Display) -> Self {
        Self::new(1, format!("Failed to start the task: {reason}"))
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.exit_code, self.has_output()) {
            (0, false) => f.write_str("Passed"),
            (0, true) => f.write_str("Passed with output"),
            (code, _) => write!(f, "Exit code {code}"),
        }
    }
}
