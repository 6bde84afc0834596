use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskmail::errors::{Result, TaskmailError};
use taskmail::mail::{Email, MailTransport};

/// A transport that keeps every e-mail instead of sending it.
///
/// With `failing()`, each send is recorded and then reported as a
/// delivery failure.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Email>>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send<'a>(
        &'a mut self,
        email: &'a Email,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(TaskmailError::Mail("relay refused connection".to_string()));
            }
            Ok(())
        })
    }
}
