// src/policy/mod.rs

//! Exit code classification and the "should we send an e-mail" decision.
//!
//! - [`exit_range`] parses `--success-codes` lists and tests membership.
//! - [`notify`] combines a run result, the success codes and the send mode.

pub mod exit_range;
pub mod notify;

pub use exit_range::{ExitRange, ExitRangeSet};
pub use notify::{NotificationPolicy, should_notify};
