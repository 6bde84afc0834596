#![allow(dead_code, unused_imports)]

pub use taskmail_test_utils::builders;
pub use taskmail_test_utils::fake_runner::FakeRunner;
pub use taskmail_test_utils::recording_transport::RecordingTransport;
pub use taskmail_test_utils::{init_tracing, with_timeout};
