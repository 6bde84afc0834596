#![allow(dead_code)]

use taskmail::config::MailSettings;
use taskmail::identity::Identity;
use taskmail::mail::MailAddress;
use taskmail::policy::{ExitRangeSet, NotificationPolicy};
use taskmail::types::SendMode;

/// Builder for `MailSettings` with test-friendly defaults.
pub struct MailSettingsBuilder {
    host: String,
    from: String,
    to: String,
}

impl MailSettingsBuilder {
    pub fn new() -> Self {
        Self {
            host: "mail.example.com".to_string(),
            from: "Build Bot <bot@example.com>".to_string(),
            to: "ops@example.com".to_string(),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn from(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    pub fn to(mut self, to: &str) -> Self {
        self.to = to.to_string();
        self
    }

    pub fn build(self) -> MailSettings {
        MailSettings {
            host: self.host,
            from: MailAddress::parse(&self.from).expect("builder 'from' must be a valid address"),
            to: MailAddress::parse(&self.to).expect("builder 'to' must be a valid address"),
        }
    }
}

impl Default for MailSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `NotificationPolicy`.
pub struct PolicyBuilder {
    success_codes: String,
    send_mode: SendMode,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self {
            success_codes: "0".to_string(),
            send_mode: SendMode::default(),
        }
    }

    pub fn success_codes(mut self, list: &str) -> Self {
        self.success_codes = list.to_string();
        self
    }

    pub fn send_mode(mut self, mode: SendMode) -> Self {
        self.send_mode = mode;
        self
    }

    pub fn build(self) -> NotificationPolicy {
        let codes = ExitRangeSet::parse_list(&self.success_codes)
            .expect("builder success codes must parse");
        NotificationPolicy::new(codes, self.send_mode)
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed identity so subjects and bodies are predictable.
pub fn test_identity() -> Identity {
    Identity {
        machine: "BUILD01".to_string(),
        user: "CORP\\builder".to_string(),
    }
}
