// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::mail::MailAddress;

/// On-disk settings file, as read from TOML.
///
/// ```toml
/// host = "mail.example.com:25"
/// from = "Build Bot <bot@example.com>"
/// to = "ops@example.com"
/// ```
///
/// Every field is optional; a file may supply just the ones it wants to
/// override. Addresses are kept as strings here so that a bad value in one
/// file doesn't prevent the rest from loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// One layer of e-mail settings (defaults, a config file, or the command
/// line). Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSettings {
    pub host: Option<String>,
    pub from: Option<MailAddress>,
    pub to: Option<MailAddress>,
}

impl EmailSettings {
    pub fn new(host: Option<String>, from: Option<MailAddress>, to: Option<MailAddress>) -> Self {
        Self { host, from, to }
    }

    /// Overlay `other` on top of `self`: fields set in `other` win.
    pub fn merge_in(self, other: EmailSettings) -> EmailSettings {
        EmailSettings {
            host: other.host.or(self.host),
            from: other.from.or(self.from),
            to: other.to.or(self.to),
        }
    }

    /// True when host, from and to are all present.
    pub fn is_valid(&self) -> bool {
        self.host.is_some() && self.from.is_some() && self.to.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.from.is_none() && self.to.is_none()
    }
}

/// Fully resolved settings: everything needed to send a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub from: MailAddress,
    pub to: MailAddress,
}
