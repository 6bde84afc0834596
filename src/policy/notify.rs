// src/policy/notify.rs

//! Decide whether a finished run warrants a notification.

use crate::exec::RunResult;
use crate::policy::ExitRangeSet;
use crate::types::SendMode;

/// Success/failure classification plus the send mode, bundled so callers
/// can pass one value around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPolicy {
    pub success_codes: ExitRangeSet,
    pub send_mode: SendMode,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            success_codes: ExitRangeSet::zero(),
            send_mode: SendMode::default(),
        }
    }
}

impl NotificationPolicy {
    pub fn new(success_codes: ExitRangeSet, send_mode: SendMode) -> Self {
        Self {
            success_codes,
            send_mode,
        }
    }

    /// A run succeeded iff its exit code is one of the configured codes.
    pub fn is_success(&self, result: &RunResult) -> bool {
        self.success_codes.contains(result.exit_code())
    }

    pub fn should_notify(&self, result: &RunResult) -> bool {
        should_notify(result, &self.success_codes, self.send_mode)
    }
}

/// Free-function form of [`NotificationPolicy::should_notify`].
pub fn should_notify(result: &RunResult, success_codes: &ExitRangeSet, send_mode: SendMode) -> bool {
    let failed = !success_codes.contains(result.exit_code());
    match send_mode {
        SendMode::Always => true,
        SendMode::OnFailure => failed,
        SendMode::OnFailureOrOutput => failed || !result.output().is_empty(),
    }
}
