use std::fmt;
use std::str::FromStr;

/// When to send a notification e-mail after the task has finished.
///
/// - `OnFailure`: only when the exit code is not one of the success codes.
/// - `OnFailureOrOutput`: on failure, or when the task wrote anything to
///   stdout/stderr (default behaviour).
/// - `Always`: unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SendMode {
    OnFailure,
    #[default]
    OnFailureOrOutput,
    Always,
}

impl SendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendMode::OnFailure => "on-failure",
            SendMode::OnFailureOrOutput => "on-failure-or-output",
            SendMode::Always => "always",
        }
    }
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "on-failure" => Ok(SendMode::OnFailure),
            "on-failure-or-output" => Ok(SendMode::OnFailureOrOutput),
            "always" => Ok(SendMode::Always),
            other => Err(format!(
                "invalid send mode: {other} (expected \"on-failure\", \"on-failure-or-output\" or \"always\")"
            )),
        }
    }
}
