// src/exec/output.rs

//! Shared, append-only output buffer.
//!
//! Both stream drainers hold a clone of the same [`OutputBuffer`]. Every
//! line is appended under a single mutex, so lines are never torn or
//! interleaved mid-line. There is no ordering guarantee between stdout and
//! stderr beyond "whichever drainer took the lock first".

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<String>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` followed by a `\n` terminator.
    pub fn append_line(&self, line: &str) {
        let mut buf = self.lock();
        buf.push_str(line);
        buf.push('\n');
    }

    /// Snapshot of everything appended so far.
    pub fn contents(&self) -> String {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A drainer panicking mid-append cannot leave the String in an invalid
    // state, so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
