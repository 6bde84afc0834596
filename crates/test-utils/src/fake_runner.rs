use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskmail::errors::Result;
use taskmail::exec::{RunResult, RunnerBackend, TargetCommand};

/// A fake runner that:
/// - records the argv of every command it was asked to run
/// - returns the same canned `RunResult` each time.
pub struct FakeRunner {
    result: RunResult,
    executed: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeRunner {
    pub fn new(result: RunResult) -> Self {
        Self {
            result,
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded commands.
    pub fn executed(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.executed)
    }
}

impl RunnerBackend for FakeRunner {
    fn run<'a>(
        &'a mut self,
        target: &'a TargetCommand,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(target.argv().to_vec());
            Ok(self.result.clone())
        })
    }
}
